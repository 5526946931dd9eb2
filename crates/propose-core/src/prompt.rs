//! Prompt text for the extraction and generation calls.
//!
//! Builders are pure so the exact upstream payload can be asserted in tests
//! without any HTTP involved.

use propose_types::ChatMessage;

use crate::content::ContentSource;
use crate::request::{ClientInfo, GenerationRequest, OutputFormat};

// ── Extraction ───────────────────────────────────────────────────────────────

pub const AUDIO_SYSTEM_PROMPT: &str = "你是一个专业的语音转文字助手。请准确地将音频内容转录成文字，保持原意。如果音频中有多人对话，请标注不同的说话者。";

pub const AUDIO_USER_PROMPT: &str = "请将以下音频内容转录成文字：";

pub const DOCUMENT_SYSTEM_PROMPT: &str = "你是一个专业的文档解析助手。请完整、准确地提取文档中的全部文字内容，保留原有的段落、列表和表格结构，不要总结、删减或改写。";

pub const DOCUMENT_USER_PROMPT: &str = "请提取以下文档中的全部文字内容：";

/// Messages for the extraction call, or `None` for inline text.
pub fn extraction_messages(source: &ContentSource) -> Option<Vec<ChatMessage>> {
    let (system, instruction) = match source {
        ContentSource::InlineText(_) => return None,
        ContentSource::Document { .. } => (DOCUMENT_SYSTEM_PROMPT, DOCUMENT_USER_PROMPT),
        ContentSource::Audio { .. } => (AUDIO_SYSTEM_PROMPT, AUDIO_USER_PROMPT),
    };
    let data_url = source.data_url()?;
    Some(vec![
        ChatMessage::system(system),
        ChatMessage::user_with_attachment(instruction, data_url),
    ])
}

// ── Generation ───────────────────────────────────────────────────────────────

/// Proposal template used when the request carries none. `XXX` is replaced
/// by the client brand when one is given.
pub const DEFAULT_PROPOSAL_TEMPLATE: &str = "根据客户需求推荐2个服务套餐写成《XXX x Nexad: 市场穿透与全球增长护城河构建方案》，尽量用表格形式。分成两部分：一、汇总Customer Context，二、 推荐的解决方案

第一部分：
一、XXX 决策背景与核心需求汇总 (Customer Context)
表 1：战略目标与增长兴趣点 (Goals & Interests)
目标类别
详细描述
投放目标

预算预期

核心兴趣点

反向工程

表 2：业务现状与产品优势 (Status Quo)
维度
详细情况与核心卖点
产品核心卖点

具体产品与产品类型

市场竞争格局

营销现状与痛点

商业模式

战略与节奏

二、 推荐的解决方案
套餐分成A. Nexad Growth Credits 和 B. Nexad Solution Credits 。
A是广告投放金额（较便宜的套餐默认不填广告金额，备注优化师团队调研后决定），表格里写优化团队根据调研结果评估即可。";

const BRAND_PLACEHOLDER: &str = "XXX";

pub const SECOND_VARIANT_HINT: &str = "注意：这是第二个备选方案。请在套餐组合、预算分配或策略侧重点上与第一个方案明显不同，为客户提供另一种可行的选择。";

pub const MARKDOWN_INSTRUCTIONS: &str = "请根据以上信息生成专业的报价方案，使用Markdown格式输出。确保：
1. 准确理解客户的需求和业务背景
2. 根据客户情况推荐最合适的套餐组合
3. 使用表格清晰展示信息
4. 包含投入产出预估
5. 语言专业且有说服力";

pub const PLAIN_TEXT_INSTRUCTIONS: &str = "请根据以上信息生成专业的报价方案，使用纯文本格式输出，不要使用任何Markdown语法（例如 #、*、|、``` 等符号），用空行和编号组织层次。确保：
1. 准确理解客户的需求和业务背景
2. 根据客户情况推荐最合适的套餐组合
3. 用清晰的分项列表展示信息
4. 包含投入产出预估
5. 语言专业且有说服力";

pub const MARKDOWN_SYSTEM_PROMPT: &str = "你是 Nexad 的专业销售顾问，擅长根据客户需求制定精准的营销解决方案。你的输出应该专业、有条理、使用Markdown格式，并且重点突出客户价值。";

pub const PLAIN_TEXT_SYSTEM_PROMPT: &str = "你是 Nexad 的专业销售顾问，擅长根据客户需求制定精准的营销解决方案。你的输出应该专业、有条理、使用纯文本格式（不使用Markdown），并且重点突出客户价值。";

/// Which of the (up to two) proposals is being generated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Variant {
    Primary,
    Secondary,
}

impl std::fmt::Display for Variant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Variant::Primary => f.write_str("primary"),
            Variant::Secondary => f.write_str("secondary"),
        }
    }
}

pub fn system_prompt(format: OutputFormat) -> &'static str {
    match format {
        OutputFormat::Markdown => MARKDOWN_SYSTEM_PROMPT,
        OutputFormat::PlainText => PLAIN_TEXT_SYSTEM_PROMPT,
    }
}

fn format_instructions(format: OutputFormat) -> &'static str {
    match format {
        OutputFormat::Markdown => MARKDOWN_INSTRUCTIONS,
        OutputFormat::PlainText => PLAIN_TEXT_INSTRUCTIONS,
    }
}

fn client_block(client: &ClientInfo) -> Option<String> {
    if client.is_empty() {
        return None;
    }
    let mut block = String::from("客户信息：");
    if let Some(brand) = &client.brand {
        block.push_str("\n- 品牌名称：");
        block.push_str(brand);
    }
    if let Some(url) = &client.product_url {
        block.push_str("\n- 产品页面：");
        block.push_str(url);
    }
    Some(block)
}

/// Assemble the user prompt for one generation call.
///
/// Sections, in order: template, second-variant hint, client block,
/// extracted text, price list, format instructions.
pub fn generation_prompt(request: &GenerationRequest, extracted_text: &str, variant: Variant) -> String {
    let template = request
        .prompt_template
        .as_deref()
        .unwrap_or(DEFAULT_PROPOSAL_TEMPLATE);
    let template = match &request.client.brand {
        Some(brand) => template.replace(BRAND_PLACEHOLDER, brand),
        None => template.to_owned(),
    };

    let mut sections = vec![template];
    if variant == Variant::Secondary {
        sections.push(SECOND_VARIANT_HINT.to_owned());
    }
    if let Some(block) = client_block(&request.client) {
        sections.push(block);
    }
    sections.push(format!("以下是客户沟通内容：\n{extracted_text}"));
    sections.push(format!("以下是公司价目表：\n{}", request.price_list));
    sections.push(format_instructions(request.output_format).to_owned());
    sections.join("\n\n")
}

/// System + user messages for one generation call.
pub fn generation_messages(
    request: &GenerationRequest,
    extracted_text: &str,
    variant: Variant,
) -> Vec<ChatMessage> {
    vec![
        ChatMessage::system(system_prompt(request.output_format)),
        ChatMessage::user(generation_prompt(request, extracted_text, variant)),
    ]
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::request::VariantCount;
    use bytes::Bytes;
    use propose_types::chat::{ContentPart, MessageContent};

    fn request() -> GenerationRequest {
        GenerationRequest {
            source: ContentSource::InlineText("客户想拓展欧洲市场".into()),
            price_list: "套餐A: $100".into(),
            prompt_template: None,
            model: None,
            variants: VariantCount::Single,
            client: ClientInfo::default(),
            output_format: OutputFormat::Markdown,
        }
    }

    #[test]
    fn sections_appear_in_order() {
        let mut req = request();
        req.client.brand = Some("Wavenote".into());
        req.client.product_url = Some("https://wavenote.example".into());
        let prompt = generation_prompt(&req, "客户想拓展欧洲市场", Variant::Secondary);

        let positions: Vec<usize> = [
            "《Wavenote x Nexad",
            SECOND_VARIANT_HINT,
            "- 品牌名称：Wavenote",
            "- 产品页面：https://wavenote.example",
            "客户想拓展欧洲市场",
            "套餐A: $100",
            MARKDOWN_INSTRUCTIONS,
        ]
        .iter()
        .map(|needle| prompt.find(needle).unwrap_or_else(|| panic!("missing {needle}")))
        .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]), "{positions:?}");
        assert!(!prompt.contains("XXX"));
    }

    #[test]
    fn primary_has_no_variant_hint_and_no_client_block() {
        let prompt = generation_prompt(&request(), "文本", Variant::Primary);
        assert!(!prompt.contains(SECOND_VARIANT_HINT));
        assert!(!prompt.contains("客户信息："));
        assert!(prompt.starts_with("根据客户需求推荐2个服务套餐"));
    }

    #[test]
    fn custom_template_replaces_default() {
        let mut req = request();
        req.prompt_template = Some("只输出一句话".into());
        let prompt = generation_prompt(&req, "文本", Variant::Primary);
        assert!(prompt.starts_with("只输出一句话"));
        assert!(!prompt.contains("Nexad Growth Credits"));
    }

    #[test]
    fn plain_text_switches_instructions_and_system_prompt() {
        let mut req = request();
        req.output_format = OutputFormat::PlainText;
        let messages = generation_messages(&req, "文本", Variant::Primary);
        assert_eq!(messages[0], ChatMessage::system(PLAIN_TEXT_SYSTEM_PROMPT));
        match &messages[1].content {
            MessageContent::Text(text) => {
                assert!(text.ends_with(PLAIN_TEXT_INSTRUCTIONS));
                assert!(!text.contains(MARKDOWN_INSTRUCTIONS));
            }
            other => panic!("unexpected content {other:?}"),
        }
    }

    #[test]
    fn inline_text_needs_no_extraction() {
        assert!(extraction_messages(&ContentSource::InlineText("x".into())).is_none());
    }

    #[test]
    fn audio_extraction_inlines_data_url() {
        let source = ContentSource::Audio {
            data: Bytes::from_static(b"hello"),
            mime: "audio/mpeg".into(),
        };
        let messages = extraction_messages(&source).unwrap();
        assert_eq!(messages[0], ChatMessage::system(AUDIO_SYSTEM_PROMPT));
        match &messages[1].content {
            MessageContent::Parts(parts) => assert_eq!(
                parts[1],
                ContentPart::ImageUrl {
                    image_url: propose_types::chat::ImageUrl {
                        url: "data:audio/mpeg;base64,aGVsbG8=".into()
                    }
                }
            ),
            other => panic!("unexpected content {other:?}"),
        }
    }

    #[test]
    fn document_extraction_uses_document_instructions() {
        let source = ContentSource::Document {
            data: Bytes::from_static(b"%PDF"),
            mime: "application/pdf".into(),
        };
        let messages = extraction_messages(&source).unwrap();
        assert_eq!(messages[0], ChatMessage::system(DOCUMENT_SYSTEM_PROMPT));
    }
}
