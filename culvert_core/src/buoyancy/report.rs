//! Plain-text buoyancy report.
//!
//! Every intermediate quantity is printed so the report can be audited by
//! hand. Number formatting: whole millimetres with thousands separators,
//! areas and forces to 2 decimals, metre values to 3 decimals.

use super::{check, BuoyancyCheck, ShapeKind, ShapeRole, Verdict, WeightShape, GAMMA_CONCRETE, GAMMA_WATER};
use crate::ground::GroundModel;
use crate::section::StructuralSection;

/// Shown instead of a report when the section cannot be resolved.
pub const PLACEHOLDER_REPORT: &str = "단면제원 데이터를 입력하세요";

fn rule(ch: char, len: usize) -> String {
    std::iter::repeat(ch).take(len).collect()
}

/// Group the integer digits of `digits` in threes.
fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Fixed-point with thousands separators.
pub fn format_fixed(value: f64, decimals: usize) -> String {
    let text = format!("{:.*}", decimals, value.abs());
    let (int_part, frac_part) = match text.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (text.as_str(), None),
    };
    let is_zero = text.chars().all(|c| c == '0' || c == '.');
    let mut out = String::new();
    if value < 0.0 && !is_zero {
        out.push('-');
    }
    out.push_str(&group_thousands(int_part));
    if let Some(frac) = frac_part {
        out.push('.');
        out.push_str(frac);
    }
    out
}

/// Millimetre magnitude: integers as-is, anything else to 1 decimal.
pub fn format_mm(value: f64) -> String {
    if value.fract() == 0.0 {
        format_fixed(value, 0)
    } else {
        format_fixed(value, 1)
    }
}

pub fn format_2(value: f64) -> String {
    format_fixed(value, 2)
}

pub fn format_3(value: f64) -> String {
    format_fixed(value, 3)
}

/// Run the check and render its report, or the placeholder text when the
/// section is invalid.
pub fn generate_report(section: &StructuralSection, ground: &GroundModel) -> String {
    match check(section, ground) {
        Some(result) => render(&result),
        None => PLACEHOLDER_REPORT.to_string(),
    }
}

struct Lines {
    buf: String,
    first: bool,
}

impl Lines {
    fn add(&mut self, line: impl AsRef<str>) {
        if !self.first {
            self.buf.push('\n');
        }
        self.first = false;
        self.buf.push_str(line.as_ref());
    }

    fn blank(&mut self) {
        self.add("");
    }

    fn section_title(&mut self, title: &str) {
        self.add(title);
        self.add(rule('─', 55));
    }
}

/// Render a finished check as text.
pub fn render(result: &BuoyancyCheck) -> String {
    let mut out = Lines {
        buf: String::new(),
        first: true,
    };
    let section = &result.section;
    let ground = &result.ground;
    let gc = format_2(GAMMA_CONCRETE.0);
    let tw = result.total_width;
    let th = result.total_height;

    out.add(rule('═', 60));
    out.add("         부 력 검 토 (Buoyancy Check)");
    out.add(rule('═', 60));
    out.blank();

    // 1
    out.section_title("1. 설계 조건");
    out.add(format!("   콘크리트 단위중량 (γc)  = {} kN/m³", gc));
    out.add(format!("   물의 단위중량 (γw)      = {} kN/m³", format_2(GAMMA_WATER.0)));
    out.add(format!("   흙의 단위중량 (γs)      = {} kN/m³", format_2(ground.soil_unit_weight)));
    out.add(format!("   토피 (Dc)              = {} mm", format_mm(ground.earth_cover_depth)));
    out.add(format!("   지하수위 (GWL)          = {} mm (지표면 기준)", format_mm(ground.groundwater_depth)));
    out.blank();

    // 2
    out.section_title("2. 구조물 제원");
    let mut parts = vec![format!("WL({})", format_mm(section.left_wall))];
    for (i, b) in section.cell_widths.iter().enumerate() {
        parts.push(format!("B{}({})", i + 1, format_mm(*b)));
        if let Some(wall) = section.middle_walls.get(i) {
            if i + 1 < section.cell_widths.len() {
                parts.push(format!("MW{}({})", i + 1, format_mm(wall.thickness())));
            }
        }
    }
    parts.push(format!("WR({})", format_mm(section.right_wall)));
    out.add(format!("   암거련수              = {}련", section.cell_widths.len()));
    out.add(format!("   내공높이 (H)          = {} mm", format_mm(section.h)));
    out.add(format!("   총 폭 (B_total)      = {}", parts.join(" + ")));
    out.add(format!("                         = {} mm = {} m", format_mm(tw), format_3(tw / 1000.0)));
    out.add(format!(
        "   총 높이 (H_total)     = LT({}) + H({}) + UT({})",
        format_mm(section.bottom_slab),
        format_mm(section.h),
        format_mm(section.top_slab)
    ));
    out.add(format!("                         = {} mm = {} m", format_mm(th), format_3(th / 1000.0)));
    if section.anti_float.enabled {
        let af = &section.anti_float;
        out.add("   부상방지저판           = 적용");
        out.add(format!(
            "     좌측확장: {} mm, 우측확장: {} mm, 두께: {} mm",
            format_mm(af.left_extension),
            format_mm(af.right_extension),
            format_mm(af.thickness)
        ));
        out.add(format!(
            "     하단 총폭 = {} + {} + {} = {} mm",
            format_mm(af.left_extension),
            format_mm(tw),
            format_mm(af.right_extension),
            format_mm(result.bottom_width)
        ));
    }
    out.blank();

    // 3
    out.section_title("3. 구조물 자중 산정 (단위 m 당)");
    out.add("   ※ 구조물 단면을 사각형/삼각형으로 분할하여 산정합니다.");
    out.blank();

    let mut column_header: Option<usize> = None;
    for shape in &result.shapes {
        if let ShapeRole::UpperGirder { wall, .. }
        | ShapeRole::LowerGirder { wall, .. }
        | ShapeRole::ColumnBody { wall, .. } = shape.role
        {
            if column_header != Some(wall) {
                column_header = Some(wall);
                let spacing = section.column_girder.column_spacing;
                out.add(format!("   ---- 중간벽체{} (기둥, CTC={} mm) ----", wall + 1, format_mm(spacing)));
                out.blank();
            }
        }

        write_shape(&mut out, shape, result, &gc);

        if shape.role == ShapeRole::RightWall {
            out.add("   ── 헌치 (삼각형) ──");
            out.blank();
        }
    }

    out.add(format!("   {}", rule('─', 51)));
    out.add(format!("   구조물 자중 합계 (Wc) = {} kN/m", format_2(result.self_weight.0)));
    out.blank();

    // 4
    let cover = ground.earth_cover_depth;
    out.section_title("4. 상재토 무게 (단위 m 당)");
    out.add(format!("   토피고 = {} mm = {} m", format_mm(cover), format_3(cover / 1000.0)));
    out.add(format!("   폭    = {} mm = {} m", format_mm(tw), format_3(tw / 1000.0)));
    out.add(format!(
        "   면적  = {} × {} = {} mm²",
        format_mm(tw),
        format_mm(cover),
        format_mm(result.soil_area.0)
    ));
    out.add(format!(
        "   무게 (Ws) = γs × A / 10⁶ = {} × {} / 10⁶ = {} kN/m",
        format_2(ground.soil_unit_weight),
        format_mm(result.soil_area.0),
        format_2(result.soil_weight.0)
    ));
    out.blank();

    // 5
    out.section_title("5. 부력 산정 (단위 m 당)");
    if section.anti_float.enabled {
        out.add(format!(
            "   구조물 하단 깊이 = 토피({}) + 총높이({}) + 부상방지저판({})",
            format_mm(cover),
            format_mm(th),
            format_mm(result.anti_float_thickness)
        ));
    } else {
        out.add(format!(
            "   구조물 하단 깊이 = 토피({}) + 총높이({})",
            format_mm(cover),
            format_mm(th)
        ));
    }
    out.add(format!("                     = {} mm (지표면 기준)", format_mm(result.bottom_depth)));
    out.add(format!("   지하수위            = {} mm (지표면 기준)", format_mm(ground.groundwater_depth)));
    out.blank();

    if !ground.has_groundwater() {
        out.add("   → 지하수위가 입력되지 않았으므로 부력이 발생하지 않음");
    } else if result.head <= 0.0 {
        out.add("   → 지하수위가 구조물 하단보다 깊으므로 부력이 발생하지 않음");
    } else {
        let hw_m = result.head / 1000.0;
        let bw_m = result.bottom_width / 1000.0;
        out.add(format!(
            "   수두 높이 (hw) = {} - {} = {} mm = {} m",
            format_mm(result.bottom_depth),
            format_mm(ground.groundwater_depth),
            format_mm(result.head),
            format_3(hw_m)
        ));
        out.add(format!(
            "   부력 작용 폭   = {} mm = {} m",
            format_mm(result.bottom_width),
            format_3(bw_m)
        ));
        out.blank();
        out.add("   부력 (U) = γw × hw × B_bottom");
        out.add(format!(
            "            = {} × {} × {}",
            format_2(GAMMA_WATER.0),
            format_3(hw_m),
            format_3(bw_m)
        ));
        out.add(format!("            = {} kN/m", format_2(result.uplift.0)));
    }
    out.blank();

    // 6
    out.section_title("6. 안전율 검토");
    out.add("   저항력 (R) = Wc + Ws");
    out.add(format!(
        "              = {} + {}",
        format_2(result.self_weight.0),
        format_2(result.soil_weight.0)
    ));
    out.add(format!("              = {} kN/m", format_2(result.resistance.0)));
    out.blank();
    out.add(format!("   부력 (U)   = {} kN/m", format_2(result.uplift.0)));
    out.blank();

    match (result.safety_factor, result.verdict) {
        (Some(fs), verdict) => {
            out.add("   안전율 (FS) = R / U");
            out.add(format!(
                "               = {} / {}",
                format_2(result.resistance.0),
                format_2(result.uplift.0)
            ));
            out.add(format!("               = {}", format_2(fs)));
            out.blank();
            out.add("   필요 안전율 ≥ 1.20");
            out.blank();
            if verdict == Verdict::Pass {
                out.add(format!("   FS = {} ≥ 1.20  →  O.K.", format_2(fs)));
            } else {
                out.add(format!("   FS = {} < 1.20  →  N.G.", format_2(fs)));
            }
        }
        (None, _) => {
            if ground.has_groundwater() {
                out.add("   지하수위가 구조물 하단보다 깊으므로 부력이 작용하지 않습니다.");
            } else {
                out.add("   지하수위가 입력되지 않아 부력이 작용하지 않습니다.");
            }
            out.add("   부력 검토가 필요하지 않습니다. → O.K.");
        }
    }
    out.blank();
    out.add(rule('═', 60));

    out.buf
}

fn write_shape(out: &mut Lines, shape: &WeightShape, result: &BuoyancyCheck, gc: &str) {
    let section = &result.section;
    let n = shape.number;
    let (w, h) = (shape.width, shape.height);
    let area = shape.area.0;
    let weight = format_2(shape.weight.0);

    match (shape.kind, shape.role) {
        (ShapeKind::Triangle, role) => {
            out.add(format!("   [삼각형 No.{}] {}", n, role.label()));
            let factor = if shape.figures.len() > 1 { "2 × 0.5" } else { "0.5" };
            out.add(format!(
                "     면적 = {} × {} × {} = {} mm²",
                factor,
                format_mm(w),
                format_mm(h),
                format_2(area)
            ));
            out.add(format!("     무게 W = {} × {} / 10⁶ = {} kN/m", gc, format_2(area), weight));
        }
        (
            _,
            role @ (ShapeRole::UpperGirder {
                haunch_height,
                extra_height,
                ..
            }
            | ShapeRole::LowerGirder {
                haunch_height,
                extra_height,
                ..
            }),
        ) => {
            out.add(format!("   [사각형 No.{}] {}", n, role.label()));
            out.add(format!(
                "     거더높이 = 헌치높이({}) + 추가높이({}) = {} mm",
                format_mm(haunch_height),
                format_mm(extra_height),
                format_mm(h)
            ));
            out.add(format!("     크기 = {} × {} mm", format_mm(w), format_mm(h)));
            out.add(format!("     면적 A = {} × {} = {} mm²", format_mm(w), format_mm(h), format_mm(area)));
            out.add(format!("     무게 W = {} × {} / 10⁶ = {} kN/m", gc, format_mm(area), weight));
        }
        (
            _,
            role @ ShapeRole::ColumnBody {
                column_width,
                spacing,
                upper_girder_depth,
                lower_girder_depth,
                ..
            },
        ) => {
            let full = w * h;
            out.add(format!("   [사각형 No.{}] {}", n, role.label()));
            out.add(format!(
                "     기둥높이 = H({}) - 상부거더({}) - 하부거더({}) = {} mm",
                format_mm(section.h),
                format_mm(upper_girder_depth),
                format_mm(lower_girder_depth),
                format_mm(h)
            ));
            out.add(format!("     기둥 단면적 = {} × {} = {} mm²", format_mm(w), format_mm(h), format_mm(full)));
            out.add(format!(
                "     단위m 환산 = {} × 기둥폭({}) / CTC({})",
                format_mm(full),
                format_mm(column_width),
                format_mm(spacing)
            ));
            out.add(format!("                = {} mm²/m", format_2(area)));
            out.add(format!("     무게 W = {} × {} / 10⁶ = {} kN/m", gc, format_2(area), weight));
        }
        (
            _,
            role @ ShapeRole::AntiFloat {
                left_extension,
                right_extension,
            },
        ) => {
            out.add(format!("   [사각형 No.{}] {}", n, role.label()));
            out.add(format!(
                "     폭 = {} + {} + {} = {} mm",
                format_mm(left_extension),
                format_mm(result.total_width),
                format_mm(right_extension),
                format_mm(w)
            ));
            out.add(format!("     크기 = {} × {} mm", format_mm(w), format_mm(h)));
            out.add(format!("     면적 A = {} × {} = {} mm²", format_mm(w), format_mm(h), format_mm(area)));
            out.add(format!("     무게 W = {} × {} / 10⁶ = {} kN/m", gc, format_mm(area), weight));
        }
        (_, role) => {
            out.add(format!("   [사각형 No.{}] {}", n, role.label()));
            out.add(format!("     크기 = {} × {} mm", format_mm(w), format_mm(h)));
            out.add(format!("     면적 A = {} × {} = {} mm²", format_mm(w), format_mm(h), format_mm(area)));
            out.add(format!(
                "     무게 W = γc × A / 10⁶ = {} × {} / 10⁶ = {} kN/m",
                gc,
                format_mm(area),
                weight
            ));
        }
    }
    out.blank();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::section::MiddleWall;

    #[test]
    fn test_number_formatting() {
        assert_eq!(format_mm(14_400.0), "14,400");
        assert_eq!(format_mm(600.0), "600");
        assert_eq!(format_mm(1_234.56), "1,234.6");
        assert_eq!(format_mm(-2_500.0), "-2,500");
        assert_eq!(format_2(649.8144), "649.81");
        assert_eq!(format_2(1_234_567.891), "1,234,567.89");
        assert_eq!(format_3(4.6), "4.600");
        assert_eq!(format_fixed(-0.0001, 2), "0.00");
    }

    #[test]
    fn test_report_sections_in_order() {
        let report = generate_report(&StructuralSection::default(), &GroundModel::default());
        let titles = [
            "부 력 검 토 (Buoyancy Check)",
            "1. 설계 조건",
            "2. 구조물 제원",
            "3. 구조물 자중 산정 (단위 m 당)",
            "── 헌치 (삼각형) ──",
            "구조물 자중 합계 (Wc)",
            "4. 상재토 무게 (단위 m 당)",
            "5. 부력 산정 (단위 m 당)",
            "6. 안전율 검토",
        ];
        let mut last = 0;
        for title in titles {
            let pos = report.find(title).unwrap_or_else(|| panic!("missing {}", title));
            assert!(pos >= last, "{} out of order", title);
            last = pos;
        }
        assert!(report.starts_with(&"═".repeat(60)));
        assert!(report.ends_with(&"═".repeat(60)));
    }

    #[test]
    fn test_report_default_values() {
        let report = generate_report(&StructuralSection::default(), &GroundModel::default());
        assert!(report.contains("WL(600) + B1(4,000) + MW1(600) + B2(4,000) + MW2(600) + B3(4,000) + WR(600)"));
        assert!(report.contains("= 14,400 mm = 14.400 m"));
        assert!(report.contains("수두 높이 (hw) = 7,600 - 3,000 = 4,600 mm = 4.600 m"));
        assert!(report.contains("= 649.81 kN/m"));
        assert!(report.contains("→  O.K."));
        assert!(report.contains("[삼각형 No.9] 중간벽1 상부헌치 (양쪽 2개)"));
        assert!(report.contains("면적 = 2 × 0.5 × 150 × 150 = 22,500.00 mm²"));
    }

    #[test]
    fn test_report_without_groundwater() {
        let ground = GroundModel {
            earth_cover_depth: 0.0,
            groundwater_depth: 0.0,
            ..GroundModel::default()
        };
        let report = generate_report(&StructuralSection::default(), &ground);
        assert!(report.contains("→ 지하수위가 입력되지 않았으므로 부력이 발생하지 않음"));
        assert!(report.contains("지하수위가 입력되지 않아 부력이 작용하지 않습니다."));
        assert!(!report.contains("구조물 하단보다 깊으므로"));
        assert!(report.contains("부력 검토가 필요하지 않습니다. → O.K."));
        assert!(!report.contains("안전율 (FS)"));
    }

    #[test]
    fn test_report_water_below_structure() {
        let ground = GroundModel {
            groundwater_depth: 9_000.0,
            ..GroundModel::default()
        };
        let report = generate_report(&StructuralSection::default(), &ground);
        assert!(report.contains("→ 지하수위가 구조물 하단보다 깊으므로 부력이 발생하지 않음"));
        assert!(report.contains("지하수위가 구조물 하단보다 깊으므로 부력이 작용하지 않습니다."));
        assert!(!report.contains("입력되지 않"));
    }

    #[test]
    fn test_anti_float_width_adds_up() {
        let mut section = StructuralSection::default();
        section.anti_float.enabled = true;
        let report = generate_report(&section, &GroundModel::default());
        assert!(report.contains("폭 = 500 + 14,400 + 500 = 15,400 mm"));
    }

    #[test]
    fn test_report_column_block() {
        let mut section = StructuralSection::default();
        section.middle_walls[1] = MiddleWall::Column { thickness: 600.0 };
        let report = generate_report(&section, &GroundModel::default());
        assert!(report.contains("---- 중간벽체2 (기둥, CTC=3,000 mm) ----"));
        assert!(report.contains("중간벽체2 기둥본체 (CTC 고려)"));
        assert!(report.contains("단위m 환산 = 2,340,000 × 기둥폭(500) / CTC(3,000)"));
        assert!(report.contains("= 390,000.00 mm²/m"));
    }

    #[test]
    fn test_placeholder_for_invalid_section() {
        let mut section = StructuralSection::default();
        section.top_slab = 0.0;
        assert_eq!(generate_report(&section, &GroundModel::default()), PLACEHOLDER_REPORT);
    }
}
