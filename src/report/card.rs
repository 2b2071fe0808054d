//! Student report card - a printable RTL HTML page per student

use super::escape_html;
use crate::types::StudentRecord;
use chrono::Local;

/// Card accent color per category; unknown categories fall back to the
/// neutral app color.
const CATEGORY_COLORS: [(&str, &str); 5] = [
    ("البلاتينية", "#f093fb"),
    ("الذهبي", "#ffd89b"),
    ("الفضي", "#a8edea"),
    ("البرونزي", "#ff9a56"),
    ("تحتاج إلى تحسين", "#ff6b6b"),
];

const DEFAULT_CATEGORY_COLOR: &str = "#667eea";

fn category_color(category: &str) -> &'static str {
    CATEGORY_COLORS
        .iter()
        .find(|(name, _)| *name == category)
        .map(|(_, color)| *color)
        .unwrap_or(DEFAULT_CATEGORY_COLOR)
}

/// Render the report card for one student.
///
/// # Returns
/// A standalone RTL HTML document, styled for screen and print.
pub fn render_report_card(record: &StudentRecord) -> String {
    REPORT_CARD_TEMPLATE
        .replace("{student_name}", &escape_html(&record.name))
        .replace("{subject}", &escape_html(&record.subject))
        .replace("{level}", &escape_html(&record.level))
        .replace("{section}", &escape_html(&record.section))
        .replace("{solved}", &record.solved.to_string())
        .replace("{total}", &record.total.to_string())
        .replace("{remaining}", &record.remaining.to_string())
        .replace("{solve_pct}", &format!("{:.1}", record.solve_pct))
        .replace("{category}", &escape_html(&record.category))
        .replace("{category_color}", category_color(&record.category))
        .replace("{recommendation}", &escape_html(&record.recommendation))
        .replace("{unsolved_titles}", &escape_html(&record.unsolved_display()))
        .replace("{app_version}", env!("CARGO_PKG_VERSION"))
        .replace(
            "{generated_at}",
            &Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
        )
}

const REPORT_CARD_TEMPLATE: &str = r##"<!DOCTYPE html>
<html dir="rtl" lang="ar">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>تقرير الطالب - {student_name}</title>
    <style>
        * {
            margin: 0;
            padding: 0;
            box-sizing: border-box;
        }

        body {
            font-family: 'Segoe UI', Tahoma, Geneva, Verdana, sans-serif, 'Arial';
            background: linear-gradient(135deg, #667eea 0%, #764ba2 100%);
            padding: 20px;
            direction: rtl;
            text-align: right;
        }

        .container {
            max-width: 900px;
            margin: 0 auto;
            background: white;
            border-radius: 10px;
            box-shadow: 0 10px 40px rgba(0, 0, 0, 0.3);
            overflow: hidden;
        }

        .header {
            background: linear-gradient(135deg, #667eea 0%, #764ba2 100%);
            color: white;
            padding: 40px;
            text-align: center;
        }

        .header h1 {
            font-size: 2.5em;
            margin-bottom: 10px;
        }

        .header p {
            font-size: 1.1em;
            opacity: 0.9;
        }

        .content {
            padding: 40px;
        }

        .student-info {
            background: #f5f5f5;
            padding: 20px;
            border-radius: 8px;
            margin-bottom: 30px;
            border-right: 4px solid #667eea;
        }

        .info-row {
            display: grid;
            grid-template-columns: 1fr 1fr;
            gap: 20px;
            margin-bottom: 15px;
        }

        .info-item {
            display: flex;
            justify-content: space-between;
            align-items: center;
        }

        .info-label {
            font-weight: bold;
            color: #333;
            margin-left: 10px;
        }

        .info-value {
            color: #666;
            font-size: 1.1em;
        }

        .category-box {
            color: white;
            padding: 20px;
            border-radius: 8px;
            text-align: center;
            margin: 30px 0;
        }

        .category-box h2 {
            font-size: 2em;
            margin-bottom: 10px;
        }

        .category-box p {
            font-size: 1.1em;
            opacity: 0.95;
        }

        .recommendation {
            background: #e8f5e9;
            border-right: 4px solid #4caf50;
            padding: 20px;
            border-radius: 4px;
            margin: 20px 0;
            direction: rtl;
            text-align: right;
        }

        .recommendation p {
            color: #2e7d32;
            font-size: 1.1em;
            line-height: 1.6;
        }

        .metrics {
            display: grid;
            grid-template-columns: repeat(4, 1fr);
            gap: 15px;
            margin: 30px 0;
        }

        .metric {
            background: #f9f9f9;
            padding: 15px;
            border-radius: 8px;
            text-align: center;
            border-top: 3px solid #667eea;
        }

        .metric-value {
            font-size: 2em;
            font-weight: bold;
            color: #667eea;
        }

        .metric-label {
            font-size: 0.9em;
            color: #666;
            margin-top: 5px;
        }

        .unsolved-section {
            margin: 30px 0;
        }

        .unsolved-section h3 {
            color: #333;
            margin-bottom: 15px;
            font-size: 1.3em;
            border-bottom: 2px solid #667eea;
            padding-bottom: 10px;
        }

        .unsolved-list {
            background: #fff3e0;
            padding: 15px;
            border-radius: 8px;
        }

        .unsolved-list p {
            color: #e65100;
            line-height: 1.6;
        }

        .footer {
            background: #f5f5f5;
            padding: 20px;
            text-align: center;
            color: #999;
            font-size: 0.9em;
            margin-top: 30px;
            border-top: 1px solid #ddd;
        }

        @media print {
            body {
                background: white;
            }
            .container {
                box-shadow: none;
                max-width: 100%;
            }
            .header {
                page-break-after: avoid;
            }
        }
    </style>
</head>
<body>
    <div class="container">
        <div class="header">
            <h1>تقرير الطالب</h1>
            <p>Weekly Assessment Report</p>
        </div>

        <div class="content">
            <div class="student-info">
                <div class="info-row">
                    <div class="info-item">
                        <span class="info-value">{student_name}</span>
                        <span class="info-label">اسم الطالب:</span>
                    </div>
                    <div class="info-item">
                        <span class="info-value">{subject}</span>
                        <span class="info-label">المادة:</span>
                    </div>
                </div>
                <div class="info-row">
                    <div class="info-item">
                        <span class="info-value">{level}</span>
                        <span class="info-label">المستوى:</span>
                    </div>
                    <div class="info-item">
                        <span class="info-value">{section}</span>
                        <span class="info-label">الشعبة:</span>
                    </div>
                </div>
            </div>

            <div class="metrics">
                <div class="metric">
                    <div class="metric-value">{solved}</div>
                    <div class="metric-label">تقييمات منجزة</div>
                </div>
                <div class="metric">
                    <div class="metric-value">{total}</div>
                    <div class="metric-label">إجمالي التقييمات</div>
                </div>
                <div class="metric">
                    <div class="metric-value">{remaining}</div>
                    <div class="metric-label">غير منجزة</div>
                </div>
                <div class="metric">
                    <div class="metric-value">{solve_pct}%</div>
                    <div class="metric-label">نسبة الإنجاز</div>
                </div>
            </div>

            <div class="category-box" style="background: linear-gradient(135deg, {category_color} 0%, {category_color}dd 100%);">
                <h2>{category}</h2>
                <p>الفئة</p>
            </div>

            <div class="recommendation">
                <p>💡 {recommendation}</p>
            </div>

            <div class="unsolved-section">
                <h3>التقييمات غير المنجزة</h3>
                <div class="unsolved-list">
                    <p>{unsolved_titles}</p>
                </div>
            </div>
        </div>

        <div class="footer">
            <p>تم إنشاء التقرير بواسطة Ingaz v{app_version}</p>
            <p>{generated_at}</p>
        </div>
    </div>
</body>
</html>"##;

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_record() -> StudentRecord {
        StudentRecord {
            name: "أحمد".to_string(),
            level: "01".to_string(),
            section: "2".to_string(),
            subject: "رياضيات".to_string(),
            solved: 1,
            total: 2,
            remaining: 1,
            unsolved_titles: vec!["اختبار 2".to_string()],
            solve_pct: 50.0,
            category: "تحتاج إلى تحسين".to_string(),
            recommendation: "اجتهد أكثر، هناك فرصة للوصول إلى الفئة البلاتينية".to_string(),
        }
    }

    #[test]
    fn test_card_contains_student_fields() {
        let html = render_report_card(&sample_record());
        assert!(html.contains("أحمد"));
        assert!(html.contains("رياضيات"));
        assert!(html.contains("تحتاج إلى تحسين"));
        assert!(html.contains("اجتهد أكثر، هناك فرصة للوصول إلى الفئة البلاتينية"));
        assert!(html.contains("اختبار 2"));
        assert!(html.contains("50.0%"));
    }

    #[test]
    fn test_card_uses_category_color() {
        let html = render_report_card(&sample_record());
        assert!(html.contains("#ff6b6b"));
        assert!(html.contains("linear-gradient(135deg, #ff6b6b 0%, #ff6b6bdd 100%)"));
    }

    #[test]
    fn test_unknown_category_falls_back_to_default_color() {
        let mut record = sample_record();
        record.category = "فئة مخصصة".to_string();
        let html = render_report_card(&record);
        assert!(html.contains("linear-gradient(135deg, #667eea 0%, #667eeadd 100%)"));
    }

    #[test]
    fn test_card_escapes_markup_in_names() {
        let mut record = sample_record();
        record.name = "<b>أحمد</b>".to_string();
        let html = render_report_card(&record);
        assert!(!html.contains("<b>أحمد</b>"));
        assert!(html.contains("&lt;b&gt;أحمد&lt;/b&gt;"));
    }

    #[test]
    fn test_no_unreplaced_tokens_remain() {
        let html = render_report_card(&sample_record());
        for token in [
            "{student_name}",
            "{subject}",
            "{level}",
            "{section}",
            "{solved}",
            "{total}",
            "{remaining}",
            "{solve_pct}",
            "{category}",
            "{category_color}",
            "{recommendation}",
            "{unsolved_titles}",
            "{app_version}",
            "{generated_at}",
        ] {
            assert!(!html.contains(token), "unreplaced token: {}", token);
        }
    }

    #[test]
    fn test_card_is_rtl_document() {
        let html = render_report_card(&sample_record());
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<html dir=\"rtl\" lang=\"ar\">"));
    }
}
