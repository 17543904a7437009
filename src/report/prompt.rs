use crate::extractor::ArticleRecord;

/// Goes after every article block.
pub const ARTICLE_SEPARATOR: &str = "\n\n--------------------\n\n";

const ARTICLES_PLACEHOLDER: &str = "{articles}";

const TEMPLATE: &str = r#"你是一位资深的医药行业分析师。请根据以下抓取的微信公众号文章内容，撰写一份专业的【本周医药行业周报】。

【写作要求】：
1. 多篇文章报道同一事件时，合并为一条，不要重复罗列。
2. 提炼文章之间的关联，给出跨文章的综合判断，而不是逐篇摘要。
3. 语气专业、克制，使用医药行业的规范术语。
4. 抓取失败或没有正文的文章直接忽略，不要在周报中提及。

【输入内容】：
{articles}

【输出格式要求】（请严格遵守 Markdown 格式）：
# [请生成一个极具吸引力的大标题]
## 📅 本周导语
## 🚀 前沿动态
## 💰 资本战略
## 📝 结语
"#;

/// Article blocks in fetch order, each followed by [`ARTICLE_SEPARATOR`].
pub fn join_articles(records: &[ArticleRecord]) -> String {
    records
        .iter()
        .map(|record| record.render() + ARTICLE_SEPARATOR)
        .collect()
}

/// Embed already-joined article text into the report template.
pub fn build_prompt(articles: &str) -> String {
    TEMPLATE.replacen(ARTICLES_PLACEHOLDER, articles, 1)
}
