//! Per-sheet digest report for teachers, as plain text or HTML email body

use super::escape_html;
use crate::config::PerformanceThresholds;
use crate::types::{SheetAnalysis, StudentRecord};
use chrono::Local;

const HEAVY_DIVIDER: &str =
    "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━";

/// Class-level cutoffs for the closing recommendation, applied to the
/// share of students at or above the performance threshold.
const STRONG_CLASS_PCT: f64 = 80.0;
const FAIR_CLASS_PCT: f64 = 60.0;

/// Students of one sheet partitioned by solve percentage
struct Bands<'a> {
    high: Vec<&'a StudentRecord>,
    good: Vec<&'a StudentRecord>,
    inactive: Vec<&'a StudentRecord>,
    critical: Vec<&'a StudentRecord>,
}

/// Renders the teacher digest for analyzed sheets
pub struct DigestGenerator {
    thresholds: PerformanceThresholds,
}

impl DigestGenerator {
    pub fn new(thresholds: PerformanceThresholds) -> Self {
        Self { thresholds }
    }

    fn partition<'a>(&self, records: &'a [StudentRecord]) -> Bands<'a> {
        let mut bands = Bands {
            high: Vec::new(),
            good: Vec::new(),
            inactive: Vec::new(),
            critical: Vec::new(),
        };
        for record in records {
            if record.solve_pct >= self.thresholds.excellent {
                bands.high.push(record);
            } else if record.solve_pct >= self.thresholds.performance {
                bands.good.push(record);
            } else if record.solve_pct >= self.thresholds.critical {
                bands.inactive.push(record);
            } else {
                bands.critical.push(record);
            }
        }
        bands
    }

    /// Render the plain-text digest for one analyzed sheet.
    ///
    /// # Returns
    /// A report with section statistics, performance bands, suggested
    /// actions, and closing recommendations.
    pub fn render_text(&self, analysis: &SheetAnalysis) -> String {
        let now = Local::now();
        let bands = self.partition(&analysis.records);
        let total_students = analysis.records.len();
        let avg_solve_pct = if total_students == 0 {
            0.0
        } else {
            analysis.records.iter().map(|r| r.solve_pct).sum::<f64>() / total_students as f64
        };

        let mut report = String::new();
        report.push_str("\n╔══════════════════════════════════════════════════════════════╗\n");
        report.push_str("║           تقرير تحليل التقييمات الأسبوعية                   ║\n");
        report.push_str("║        WEEKLY ASSESSMENT ANALYSIS REPORT                      ║\n");
        report.push_str("╚══════════════════════════════════════════════════════════════╝\n");

        report.push_str("\n📋 معلومات القسم:\n");
        report.push_str(HEAVY_DIVIDER);
        report.push_str(&format!("\nالمادة:          {}\n", analysis.identity.subject));
        report.push_str(&format!("المستوى:         {}\n", analysis.identity.level));
        report.push_str(&format!("الشعبة:          {}\n", analysis.identity.section));
        report.push_str(&format!("تاريخ التقرير:   {}\n", now.format("%Y-%m-%d %H:%M")));

        report.push_str("\n📊 الإحصائيات العامة:\n");
        report.push_str(HEAVY_DIVIDER);
        report.push_str(&format!(
            "\nعدد الطلاب الكلي:       {} طالب/طالبة\n",
            total_students
        ));
        report.push_str(&format!("متوسط نسبة الإنجاز:     {:.2}%\n", avg_solve_pct));
        report.push_str(&format!(
            "عدد الطلاب المتميزين:   {} (≥ {:.0}%)\n",
            bands.high.len(),
            self.thresholds.excellent
        ));
        report.push_str(&format!(
            "عدد الطلاب الجيدين:     {} ({:.0}% - {:.0}%)\n",
            bands.good.len(),
            self.thresholds.performance,
            self.thresholds.excellent - 1.0
        ));
        report.push_str(&format!(
            "عدد الطلاب غير الفاعلين: {} ({:.0}% - {:.0}%)\n",
            bands.inactive.len(),
            self.thresholds.critical,
            self.thresholds.performance - 1.0
        ));
        report.push_str(&format!(
            "عدد الطلاب في الخطر:    {} (< {:.0}%)\n",
            bands.critical.len(),
            self.thresholds.critical
        ));

        report.push_str("\n🎯 الأداء التحليلي:\n");
        report.push_str(HEAVY_DIVIDER);
        report.push('\n');

        report.push_str(&format!("\n✨ الطلاب المتميزون ({}):\n", bands.high.len()));
        if bands.high.is_empty() {
            report.push_str("   لا يوجد طلاب متميزون حالياً\n");
        } else {
            report.push_str(&format_student_list(&bands.high, "⭐"));
        }

        report.push_str(&format!("\n✅ الطلاب الجيدون ({}):\n", bands.good.len()));
        if bands.good.is_empty() {
            report.push_str("   لا يوجد طلاب بأداء جيد\n");
        } else {
            report.push_str(&format_student_list(&bands.good, "✓"));
        }

        report.push_str(&format!(
            "\n⚠️ الطلاب غير الفاعلين - يحتاجون متابعة ({}):\n",
            bands.inactive.len()
        ));
        if bands.inactive.is_empty() {
            report.push_str("   لا يوجد طلاب في هذه الفئة (جيد!)\n");
        } else {
            report.push_str(&format_student_list(&bands.inactive, "⚠"));
            report.push_str(inactive_actions());
        }

        report.push_str(&format!(
            "\n🔴 الطلاب في الخطر الشديد - متابعة فورية ({}):\n",
            bands.critical.len()
        ));
        if bands.critical.is_empty() {
            report.push_str("   لا يوجد طلاب في وضع حرج (ممتاز!)\n");
        } else {
            report.push_str(&format_student_list(&bands.critical, "🔴"));
            report.push_str(critical_actions());
        }

        report.push_str("\n📝 التوصيات:\n");
        report.push_str(HEAVY_DIVIDER);
        report.push('\n');
        report.push_str(&self.recommendations(&bands, total_students));

        report.push('\n');
        report.push_str(HEAVY_DIVIDER);
        report.push_str(&format!(
            "\nتم إنشاء التقرير بواسطة: Ingaz v{}\n",
            env!("CARGO_PKG_VERSION")
        ));
        report.push_str(&format!("التاريخ: {}\n", now.format("%Y-%m-%d %H:%M:%S")));
        report.push_str(HEAVY_DIVIDER);
        report.push('\n');

        report
    }

    fn recommendations(&self, bands: &Bands<'_>, total_students: usize) -> String {
        let positive_percent = if total_students == 0 {
            0.0
        } else {
            (bands.high.len() + bands.good.len()) as f64 / total_students as f64 * 100.0
        };

        let mut out = format!(
            "1. الأداء العام للفصل: {:.1}% أداء إيجابي\n",
            positive_percent
        );

        if !bands.critical.is_empty() {
            out.push_str(&format!(
                "\n2. ⚠️ تنبيه: يوجد {} طالب/ة في وضع حرج\n",
                bands.critical.len()
            ));
            out.push_str("   يجب إجراء متابعة فورية ومكثفة\n");
        }

        if !bands.inactive.is_empty() {
            out.push_str(&format!(
                "\n3. متابعة: يوجد {} طالب/ة بحاجة إلى تحفيز\n",
                bands.inactive.len()
            ));
            out.push_str("   يفضل جلسات دعم تعليمي\n");
        }

        if positive_percent >= STRONG_CLASS_PCT {
            out.push_str("\n4. ✅ الأداء العام ممتاز، استمر على هذا النهج\n");
        } else if positive_percent >= FAIR_CLASS_PCT {
            out.push_str("\n4. 📈 الأداء جيد، هناك مجال للتحسن\n");
        } else {
            out.push_str("\n4. 🔴 الأداء يحتاج تحسين فوري\n");
        }

        out.push_str("\n5. الخطوات القادمة:\n");
        out.push_str("   • متابعة دورية أسبوعية\n");
        out.push_str("   • جلسات تعزيز للطلاب المتميزين\n");
        out.push_str("   • برامج دعم للطلاب الضعفاء\n");
        out.push_str("   • تواصل منتظم مع أولياء الأمور\n");

        out
    }

    /// Render the digest as a standalone HTML document. Follow-up bands
    /// get styled sections; the full text report rides along verbatim.
    pub fn render_html(&self, analysis: &SheetAnalysis) -> String {
        let now = Local::now();
        let bands = self.partition(&analysis.records);
        let text_report = self.render_text(analysis);

        let critical_html = format_students_html(&bands.critical, "danger");
        let inactive_html = format_students_html(&bands.inactive, "warning");

        DIGEST_HTML_TEMPLATE
            .replace("{subject}", &escape_html(&analysis.identity.subject))
            .replace("{level}", &escape_html(&analysis.identity.level))
            .replace("{section}", &escape_html(&analysis.identity.section))
            .replace("{generated_date}", &now.format("%Y-%m-%d %H:%M").to_string())
            .replace("{critical_section}", &critical_html)
            .replace("{inactive_section}", &inactive_html)
            .replace("{text_report}", &escape_html(&text_report))
            .replace("{app_version}", env!("CARGO_PKG_VERSION"))
            .replace(
                "{generated_at}",
                &now.format("%Y-%m-%d %H:%M:%S").to_string(),
            )
    }
}

fn format_student_list(students: &[&StudentRecord], icon: &str) -> String {
    let mut out = String::new();
    for (idx, student) in students.iter().enumerate() {
        out.push_str(&format!("   {} {}. {}\n", icon, idx + 1, student.name));
        out.push_str(&format!(
            "      النسبة: {:.2}% | منجز: {} | متبقي: {} | إجمالي: {}\n",
            student.solve_pct, student.solved, student.remaining, student.total
        ));
    }
    out
}

fn inactive_actions() -> &'static str {
    "\n   الإجراءات المقترحة:\n\
     \x20  • التواصل مع الطالب/الطالبة للتذكير\n\
     \x20  • تقديم دعم إضافي في التقييمات\n\
     \x20  • متابعة أسباب التأخر\n\
     \x20  • التشاور مع ولي الأمر إذا لزم\n"
}

fn critical_actions() -> &'static str {
    "\n   الإجراءات المقترحة (فورية):\n\
     \x20  • اتصال فوري مع الطالب/الطالبة وولي الأمر\n\
     \x20  • جلسة تقوية فورية\n\
     \x20  • تحديد أسباب الضعف\n\
     \x20  • خطة دعم شاملة\n\
     \x20  • متابعة يومية\n"
}

fn format_students_html(students: &[&StudentRecord], style: &str) -> String {
    if students.is_empty() {
        return String::new();
    }

    let title = if style == "danger" {
        "🔴 الطلاب في الخطر الشديد"
    } else {
        "⚠️ الطلاب غير الفاعلين"
    };
    let badge_text = if style == "danger" { "خطر" } else { "تحذير" };

    let mut html = format!(
        "<div class=\"section\">\n    <h2>{}</h2>\n    <div class=\"student-list\">\n",
        title
    );
    for student in students {
        html.push_str(&format!(
            "        <div class=\"student-item {style}\">\n\
             \x20           <div class=\"student-name\">{name} <span class=\"badge badge-{style}\">{badge}</span></div>\n\
             \x20           <div class=\"student-stats\">النسبة: {pct:.2}% | منجز: {solved} | متبقي: {remaining} | إجمالي: {total}</div>\n\
             \x20       </div>\n",
            style = style,
            name = escape_html(&student.name),
            badge = badge_text,
            pct = student.solve_pct,
            solved = student.solved,
            remaining = student.remaining,
            total = student.total
        ));
    }
    html.push_str("    </div>\n</div>\n");
    html
}

const DIGEST_HTML_TEMPLATE: &str = r##"<!DOCTYPE html>
<html dir="rtl" lang="ar">
<head>
    <meta charset="UTF-8">
    <style>
        body {
            font-family: 'Segoe UI', Tahoma, Geneva, Verdana, sans-serif, 'Arial';
            background: #f0f0f0;
            direction: rtl;
            text-align: right;
            padding: 20px;
        }
        .container {
            max-width: 900px;
            margin: 0 auto;
            background: white;
            padding: 30px;
            border-radius: 10px;
            box-shadow: 0 2px 10px rgba(0,0,0,0.1);
        }
        .header {
            background: linear-gradient(135deg, #667eea 0%, #764ba2 100%);
            color: white;
            padding: 20px;
            border-radius: 8px;
            margin-bottom: 20px;
            text-align: center;
        }
        .header h1 {
            margin: 0;
            font-size: 24px;
        }
        .header p {
            margin: 5px 0 0 0;
            opacity: 0.9;
        }
        .info-box {
            background: #f9f9f9;
            padding: 15px;
            border-right: 4px solid #667eea;
            margin-bottom: 20px;
            border-radius: 4px;
        }
        .info-box p {
            margin: 5px 0;
            color: #333;
        }
        .info-box strong {
            color: #667eea;
        }
        .section {
            margin: 20px 0;
        }
        .section h2 {
            color: #333;
            border-bottom: 2px solid #667eea;
            padding-bottom: 10px;
            margin-bottom: 15px;
        }
        .student-list {
            background: #f9f9f9;
            padding: 15px;
            border-radius: 8px;
            margin-bottom: 15px;
        }
        .student-item {
            padding: 10px;
            margin-bottom: 10px;
            background: white;
            border-right: 3px solid #667eea;
            border-radius: 4px;
        }
        .warning {
            border-right-color: #ff9800;
        }
        .danger {
            border-right-color: #f44336;
        }
        .student-name {
            font-weight: bold;
            font-size: 16px;
            color: #333;
        }
        .student-stats {
            font-size: 13px;
            color: #666;
            margin-top: 5px;
        }
        .badge {
            display: inline-block;
            padding: 3px 8px;
            border-radius: 12px;
            font-size: 12px;
            margin-left: 5px;
        }
        .badge-warning {
            background: #fff3cd;
            color: #856404;
        }
        .badge-danger {
            background: #f8d7da;
            color: #721c24;
        }
        .footer {
            text-align: center;
            margin-top: 20px;
            padding-top: 20px;
            border-top: 1px solid #ddd;
            color: #999;
            font-size: 12px;
        }
    </style>
</head>
<body>
    <div class="container">
        <div class="header">
            <h1>تقرير التقييمات الأسبوعية</h1>
            <p>{subject} | المستوى {level} | الشعبة {section}</p>
        </div>

        <div class="info-box">
            <p><strong>المادة:</strong> {subject}</p>
            <p><strong>المستوى:</strong> {level}</p>
            <p><strong>الشعبة:</strong> {section}</p>
            <p><strong>التاريخ:</strong> {generated_date}</p>
        </div>

        {critical_section}
        {inactive_section}

        <div class="section">
            <h2>📝 الملاحظات:</h2>
            <pre style="background: #f9f9f9; padding: 15px; border-radius: 4px;">{text_report}</pre>
        </div>

        <div class="footer">
            <p>تم إنشاء التقرير بواسطة Ingaz v{app_version}</p>
            <p>{generated_at}</p>
        </div>
    </div>
</body>
</html>"##;
