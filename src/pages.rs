//! Server-rendered HTML for the form UI.
//!
//! Everything user- or model-supplied goes through `ammonia` before it is
//! written into a page.

use ammonia::clean_text;
use pulldown_cmark::{Options, Parser, html};

use crate::digest::Stage;
use crate::extractor::{ArticleRecord, FetchStatus};

const STYLE: &str = r#"
body { font-family: -apple-system, "PingFang SC", "Microsoft YaHei", sans-serif; margin: 0; background: #f6f7f9; color: #1f2328; }
main { max-width: 1200px; margin: 0 auto; padding: 24px; }
.columns { display: grid; grid-template-columns: 1fr 1fr; gap: 24px; }
textarea { width: 100%; height: 300px; box-sizing: border-box; font-family: monospace; }
button { background: #e5484d; color: #fff; border: 0; padding: 10px 18px; border-radius: 6px; cursor: pointer; }
.notice { padding: 10px 14px; border-radius: 6px; margin: 12px 0; }
.warning { background: #fff4d6; }
.error { background: #ffe5e5; }
.success { background: #e3f7e8; }
.report { background: #fff; padding: 16px 24px; border-radius: 6px; }
ol.articles li.ok { color: #1a7f37; }
ol.articles li.failed { color: #cf222e; }
ul.progress { color: #57606a; font-size: 0.9em; padding-left: 1.2em; }
"#;

fn layout(body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="zh-CN">
<head>
<meta charset="utf-8">
<title>医药行业周报生成器</title>
<style>{STYLE}</style>
</head>
<body><main>
<h1>💊 医药行业周报 AI 生成器</h1>
{body}
</main></body>
</html>"#
    )
}

pub fn login_page(error: Option<&str>) -> String {
    let error = error
        .map(|e| format!(r#"<div class="notice error">{}</div>"#, clean_text(e)))
        .unwrap_or_default();
    layout(&format!(
        r#"<form method="post" action="/login">
<label for="password">🔒 请输入访问密码</label>
<input id="password" name="password" type="password" autofocus>
<button type="submit">进入</button>
</form>
{error}"#
    ))
}

fn input_column(links: &str) -> String {
    format!(
        r#"<section>
<h2>1. 输入文章链接</h2>
<form method="post" action="/report">
<label for="links">请把微信公众号链接粘贴在这里（一行一个，逗号或空格分隔也可以）：</label>
<textarea id="links" name="links">{}</textarea>
<button type="submit">🚀 开始生成周报</button>
</form>
</section>"#,
        clean_text(links)
    )
}

fn two_columns(links: &str, result: &str) -> String {
    layout(&format!(
        r#"<p>不用再改代码文件，直接粘贴链接，一键生成报告。</p>
<div class="columns">
{}
<section>
<h2>2. 生成结果</h2>
{result}
</section>
</div>"#,
        input_column(links)
    ))
}

pub fn form_page() -> String {
    two_columns("", "")
}

/// One line per step a run went through, in order.
pub fn progress_lines(stages: &[Stage]) -> Vec<String> {
    let mut lines = Vec::new();
    for stage in stages {
        match *stage {
            Stage::Extracting => lines.push("🔍 正在提取链接...".to_string()),
            Stage::Fetching { current, total } => {
                if current == 1 {
                    lines.push(format!("✅ 识别到 {total} 个链接"));
                }
                lines.push(format!("⏳ 正在读取第 {current}/{total} 篇..."));
            }
            Stage::Composing => lines.push("🤖 正在调用 AI 撰写周报...".to_string()),
            Stage::Idle | Stage::Done | Stage::Failed => {}
        }
    }
    lines
}

fn progress_list(stages: &[Stage]) -> String {
    let lines = progress_lines(stages);
    if lines.is_empty() {
        return String::new();
    }
    let items: String = lines
        .iter()
        .map(|line| format!("<li>{line}</li>"))
        .collect();
    format!(r#"<ul class="progress">{items}</ul>"#)
}

/// Form with a notice in the result column instead of a report.
pub fn notice_page(links: &str, class: &str, message: &str, stages: &[Stage]) -> String {
    two_columns(
        links,
        &format!(
            r#"{}<div class="notice {class}">{}</div>"#,
            progress_list(stages),
            clean_text(message)
        ),
    )
}

fn status_label(status: FetchStatus) -> &'static str {
    match status {
        FetchStatus::Ok => "已抓取",
        FetchStatus::Blocked => "触发安全验证",
        FetchStatus::NetworkError => "网络错误",
        FetchStatus::NoContent => "未抓取到正文",
    }
}

fn article_list(articles: &[ArticleRecord]) -> String {
    let items: String = articles
        .iter()
        .map(|a| {
            let class = if a.is_ok() { "ok" } else { "failed" };
            format!(
                r#"<li class="{class}">{} ({}) <small>{}</small></li>"#,
                clean_text(&a.title),
                status_label(a.status),
                clean_text(&a.source_url)
            )
        })
        .collect();
    format!(r#"<ol class="articles">{items}</ol>"#)
}

/// Markdown to HTML, then sanitized; the model's output is not trusted.
pub fn render_markdown(markdown: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);

    let mut unsafe_html = String::new();
    html::push_html(&mut unsafe_html, Parser::new_ext(markdown, options));
    ammonia::clean(&unsafe_html)
}

pub fn report_page(
    links: &str,
    markdown: &str,
    articles: &[ArticleRecord],
    stages: &[Stage],
) -> String {
    two_columns(
        links,
        &format!(
            r#"{}<div class="notice success">生成成功！</div>
{}
<form method="post" action="/report/download">
<input type="hidden" name="report" value="{}">
<button type="submit">📥 下载 Markdown</button>
</form>
<article class="report">{}</article>"#,
            progress_list(stages),
            article_list(articles),
            clean_text(markdown),
            render_markdown(markdown)
        ),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_markdown_is_rendered_and_sanitized() {
        let html = render_markdown("# 周报\n\n<script>alert(1)</script>\n\n**重点**");
        assert!(html.contains("<h1>周报</h1>"));
        assert!(html.contains("<strong>重点</strong>"));
        assert!(!html.contains("<script"));
    }

    #[test]
    fn test_user_text_is_escaped() {
        let page = notice_page("<b>x</b>", "warning", "<img src=x>", &[]);
        assert!(!page.contains("<b>x</b>"));
        assert!(!page.contains("<img src=x>"));
    }

    #[test]
    fn test_report_page_offers_download() {
        let articles = vec![ArticleRecord::blocked("https://e.com/a")];
        let page = report_page("https://e.com/a", "# 标题", &articles, &[]);
        assert!(page.contains(r#"action="/report/download""#));
        assert!(page.contains("触发安全验证"));
        assert!(page.contains("<h1>标题</h1>"));
    }

    #[test]
    fn test_hidden_report_field_preserves_markdown() {
        let markdown = "# 周报\n\n## 📅 本周导语\n\n\"引号\" & <标签> 'x' a=b\n- 项目";
        let page = report_page("", markdown, &[], &[]);

        let document = scraper::Html::parse_document(&page);
        let selector = scraper::Selector::parse(r#"input[name="report"]"#).unwrap();
        let field = document.select(&selector).next().unwrap();
        assert_eq!(field.value().attr("value"), Some(markdown));
    }

    #[test]
    fn test_progress_lines() {
        let stages = [
            Stage::Extracting,
            Stage::Fetching { current: 1, total: 2 },
            Stage::Fetching { current: 2, total: 2 },
            Stage::Composing,
            Stage::Done,
        ];
        assert_eq!(
            progress_lines(&stages),
            vec![
                "🔍 正在提取链接...",
                "✅ 识别到 2 个链接",
                "⏳ 正在读取第 1/2 篇...",
                "⏳ 正在读取第 2/2 篇...",
                "🤖 正在调用 AI 撰写周报...",
            ]
        );
        assert!(progress_lines(&[Stage::Extracting, Stage::Failed]).len() == 1);
    }

    #[test]
    fn test_login_page_error() {
        assert!(login_page(Some("❌ 密码错误，请重试")).contains("密码错误"));
        assert!(!login_page(None).contains("notice error"));
    }
}
