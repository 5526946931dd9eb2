use std::path::{Path, PathBuf};

use anyhow::Context;
use futures::future::try_join_all;
use propose_types::GenerateQuoteRequest;
use tracing::info;

use super::emit;
use crate::attachment::{Attachment, AttachmentKind, Payload};
use crate::client::ProposeClient;
use crate::draft::{Draft, InputMode};

pub async fn run(client: &ProposeClient, draft: &Draft, out: Option<&Path>) -> anyhow::Result<()> {
    draft.validate_for_generate()?;

    let mut request = base_request(draft);
    match draft.input_mode {
        InputMode::Text => request.transcript = Some(draft.transcript.clone()),
        InputMode::Audio | InputMode::Document => {
            let attachments: Vec<Attachment> =
                draft.attachments.iter().map(Attachment::from_path).collect();
            attach_content(client, draft, &mut request, &attachments).await?;
        }
    }

    info!(
        model = request.model.as_deref().unwrap_or_default(),
        generate_count = request.generate_count,
        "generating proposal"
    );
    let reply = client.generate_quote(&request).await?;
    let quote = reply.quote.unwrap_or_default();

    match (out, reply.quote2) {
        (out, None) => emit(out, &quote).await,
        (Some(path), Some(second)) => {
            emit(Some(path), &quote).await?;
            emit(Some(&second_variant_path(path)), &second).await
        }
        (None, Some(second)) => emit(None, &format!("{quote}\n\n---\n\n{second}")).await,
    }
}

/// Everything but the content source.
fn base_request(draft: &Draft) -> GenerateQuoteRequest {
    let non_empty = |s: &str| (!s.trim().is_empty()).then(|| s.to_owned());
    GenerateQuoteRequest {
        price_list: Some(draft.price_list.clone()),
        custom_prompt: non_empty(&draft.prompt_template),
        model: non_empty(&draft.model),
        generate_count: Some(if draft.generate_two { 2 } else { 1 }),
        client_brand: non_empty(&draft.client_brand),
        product_url: non_empty(&draft.product_url),
        use_markdown: Some(draft.use_markdown),
        ..Default::default()
    }
}

/// Fill the content fields from the draft's attachments.
///
/// A single file goes as-is. Several files are extracted one by one with
/// `generateCount: 0` and then sent as one combined transcript.
async fn attach_content(
    client: &ProposeClient,
    draft: &Draft,
    request: &mut GenerateQuoteRequest,
    attachments: &[Attachment],
) -> anyhow::Result<()> {
    if let [single] = attachments {
        let payload = load(single).await?;
        apply_payload(request, single.kind, payload);
        return Ok(());
    }

    info!(count = attachments.len(), "pre-extracting attachments");
    let texts = try_join_all(attachments.iter().map(|a| extract_text(client, draft, a))).await?;
    let sections = attachments.iter().map(Attachment::label).zip(texts).collect::<Vec<_>>();
    request.transcript = Some(combine_sections(&sections));
    Ok(())
}

async fn load(attachment: &Attachment) -> anyhow::Result<Payload> {
    attachment
        .load()
        .await
        .with_context(|| format!("failed to read {}", attachment.path.display()))
}

async fn extract_text(
    client: &ProposeClient,
    draft: &Draft,
    attachment: &Attachment,
) -> anyhow::Result<String> {
    let payload = load(attachment).await?;
    if let Payload::Text(text) = payload {
        return Ok(text);
    }

    let mut request = GenerateQuoteRequest {
        price_list: Some(draft.price_list.clone()),
        generate_count: Some(0),
        ..Default::default()
    };
    apply_payload(&mut request, attachment.kind, payload);
    let reply = client.generate_quote(&request).await?;
    info!(file = %attachment.label(), text_len = reply.transcription.len(), "attachment extracted");
    Ok(reply.transcription)
}

fn apply_payload(request: &mut GenerateQuoteRequest, kind: AttachmentKind, payload: Payload) {
    match (kind, payload) {
        (_, Payload::Text(text)) => request.transcript = Some(text),
        (AttachmentKind::Audio, Payload::Binary { base64, mime }) => {
            request.audio_base64 = Some(base64);
            request.mime_type = Some(mime.to_owned());
        }
        (_, Payload::Binary { base64, mime }) => {
            request.document_base64 = Some(base64);
            request.document_type = Some(mime.to_owned());
        }
    }
}

fn combine_sections(sections: &[(String, String)]) -> String {
    sections
        .iter()
        .map(|(label, text)| format!("【{label}】\n{}", text.trim()))
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// `plan.md` → `plan-2.md`.
fn second_variant_path(path: &Path) -> PathBuf {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let name = match path.extension() {
        Some(ext) => format!("{stem}-2.{}", ext.to_string_lossy()),
        None => format!("{stem}-2"),
    };
    path.with_file_name(name)
}
