use std::path::Path;

use anyhow::{anyhow, bail};
use propose_types::GenerateQuoteRequest;
use tracing::info;

use super::emit;
use crate::client::ProposeClient;
use crate::draft::Draft;

/// Template steering the model from "write a proposal" to "edit this one".
pub const REVISION_PROMPT: &str = "你是一个专业的方案修改助手。用户已有一份增长方案，现在需要根据用户的具体要求进行修改。
请：
1. 理解用户的修改意图
2. 保持方案的整体结构和专业性
3. 只修改用户要求的部分
4. 输出完整的修改后方案（Markdown格式）";

pub async fn run(
    client: &ProposeClient,
    draft: &Draft,
    current: &str,
    change: &str,
    out: Option<&Path>,
) -> anyhow::Result<()> {
    let request = revision_request(draft, current, change)?;
    info!(proposal_len = current.len(), "requesting revision");

    let reply = client.generate_quote(&request).await?;
    let revised = reply
        .quote
        .ok_or_else(|| anyhow!("server returned no revised proposal"))?;
    emit(out, &revised).await
}

fn revision_request(
    draft: &Draft,
    current: &str,
    change: &str,
) -> anyhow::Result<GenerateQuoteRequest> {
    if change.trim().is_empty() {
        bail!("请输入修改要求");
    }
    if current.trim().is_empty() {
        bail!("当前方案为空，无法修改");
    }
    if draft.price_list.trim().is_empty() {
        bail!("请填写公司价目表");
    }

    Ok(GenerateQuoteRequest {
        price_list: Some(draft.price_list.clone()),
        transcript: Some(format!(
            "当前方案内容：\n{current}\n\n用户修改要求：\n{}\n\n请根据用户的修改要求，对当前方案进行调整和优化。",
            change.trim()
        )),
        custom_prompt: Some(REVISION_PROMPT.to_owned()),
        model: (!draft.model.trim().is_empty()).then(|| draft.model.clone()),
        generate_count: Some(1),
        use_markdown: Some(draft.use_markdown),
        ..Default::default()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft() -> Draft {
        Draft {
            price_list: "套餐A: $100".into(),
            ..Draft::default()
        }
    }

    #[test]
    fn revision_carries_current_proposal_and_request() {
        let request = revision_request(&draft(), "# 方案\n预算五万", "把预算降到三万").unwrap();
        let transcript = request.transcript.unwrap();
        assert!(transcript.starts_with("当前方案内容：\n# 方案\n预算五万"));
        assert!(transcript.contains("用户修改要求：\n把预算降到三万"));
        assert_eq!(request.custom_prompt.as_deref(), Some(REVISION_PROMPT));
        assert_eq!(request.generate_count, Some(1));
        assert!(request.audio_base64.is_none());
    }

    #[test]
    fn empty_change_request_is_refused() {
        assert!(revision_request(&draft(), "# 方案", "   ").is_err());
    }

    #[test]
    fn price_list_is_still_required() {
        let draft = Draft::default();
        let err = revision_request(&draft, "# 方案", "更简洁").unwrap_err();
        assert_eq!(err.to_string(), "请填写公司价目表");
    }
}
