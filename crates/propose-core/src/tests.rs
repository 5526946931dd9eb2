use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use propose_types::chat::{ContentPart, MessageContent};
use propose_types::{ChatCompletionRequest, GenerateQuoteRequest};
use serde_json::json;
use tracing_test::traced_test;

use crate::gateway::{ChatGateway, UpstreamReply};
use crate::prompt::SECOND_VARIANT_HINT;
use crate::{PipelineOptions, ProposalError, ProposalPipeline, Stage};

type Responder =
    dyn Fn(Stage, &ChatCompletionRequest) -> Result<UpstreamReply, ProposalError> + Send + Sync;

/// In-memory gateway that answers through a closure and records every call.
struct ScriptedGateway {
    responder: Box<Responder>,
    /// Extra latency applied to second-variant generation calls.
    secondary_delay: Duration,
    calls: AtomicUsize,
    completed: AtomicUsize,
    seen: Mutex<Vec<(Stage, ChatCompletionRequest)>>,
}

impl ScriptedGateway {
    fn new(
        responder: impl Fn(Stage, &ChatCompletionRequest) -> Result<UpstreamReply, ProposalError>
        + Send
        + Sync
        + 'static,
    ) -> Arc<Self> {
        Self::with_delay(Duration::ZERO, responder)
    }

    fn with_delay(
        secondary_delay: Duration,
        responder: impl Fn(Stage, &ChatCompletionRequest) -> Result<UpstreamReply, ProposalError>
        + Send
        + Sync
        + 'static,
    ) -> Arc<Self> {
        Arc::new(Self {
            responder: Box::new(responder),
            secondary_delay,
            calls: AtomicUsize::new(0),
            completed: AtomicUsize::new(0),
            seen: Mutex::new(Vec::new()),
        })
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn seen(&self) -> Vec<(Stage, ChatCompletionRequest)> {
        self.seen.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChatGateway for ScriptedGateway {
    async fn send(
        &self,
        stage: Stage,
        request: &ChatCompletionRequest,
    ) -> Result<UpstreamReply, ProposalError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.seen.lock().unwrap().push((stage, request.clone()));
        if is_secondary(request) && !self.secondary_delay.is_zero() {
            tokio::time::sleep(self.secondary_delay).await;
        }
        let reply = (self.responder)(stage, request);
        self.completed.fetch_add(1, Ordering::SeqCst);
        reply
    }
}

fn completion(text: &str) -> Result<UpstreamReply, ProposalError> {
    Ok(UpstreamReply::new(
        200,
        json!({ "choices": [ { "message": { "role": "assistant", "content": text } } ] }).to_string(),
    ))
}

/// Concatenated text of the last (user) message.
fn user_text(request: &ChatCompletionRequest) -> String {
    match request.messages.last().map(|m| &m.content) {
        Some(MessageContent::Text(text)) => text.clone(),
        Some(MessageContent::Parts(parts)) => parts
            .iter()
            .filter_map(|p| match p {
                ContentPart::Text { text } => Some(text.as_str()),
                ContentPart::ImageUrl { .. } => None,
            })
            .collect(),
        None => String::new(),
    }
}

fn is_secondary(request: &ChatCompletionRequest) -> bool {
    user_text(request).contains(SECOND_VARIANT_HINT)
}

fn pipeline(gateway: Arc<ScriptedGateway>) -> ProposalPipeline {
    ProposalPipeline::new(
        gateway,
        PipelineOptions {
            default_model: "test/generate".into(),
            extraction_model: "test/extract".into(),
        },
    )
}

fn text_request(count: i64) -> GenerateQuoteRequest {
    GenerateQuoteRequest {
        transcript: Some("客户想拓展欧洲市场".into()),
        price_list: Some("套餐A: $100".into()),
        generate_count: Some(count),
        ..Default::default()
    }
}

fn audio_request(count: i64) -> GenerateQuoteRequest {
    GenerateQuoteRequest {
        audio_base64: Some("aGVsbG8=".into()),
        mime_type: Some("audio/mpeg".into()),
        price_list: Some("套餐A: $100".into()),
        generate_count: Some(count),
        ..Default::default()
    }
}

// ── Validation ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn missing_content_makes_no_upstream_call() {
    let gateway = ScriptedGateway::new(|_, _| completion("unused"));
    let err = pipeline(gateway.clone())
        .process(GenerateQuoteRequest {
            price_list: Some("套餐A: $100".into()),
            ..Default::default()
        })
        .await
        .unwrap_err();

    assert!(matches!(err, ProposalError::InvalidInput(_)));
    assert_eq!(gateway.calls(), 0);
}

#[tokio::test]
async fn missing_price_list_makes_no_upstream_call() {
    let gateway = ScriptedGateway::new(|_, _| completion("unused"));
    let err = pipeline(gateway.clone())
        .process(GenerateQuoteRequest {
            audio_base64: Some("aGVsbG8=".into()),
            ..Default::default()
        })
        .await
        .unwrap_err();

    assert!(matches!(err, ProposalError::InvalidInput(_)));
    assert_eq!(gateway.calls(), 0);
}

// ── Extraction paths ──────────────────────────────────────────────────────────

#[tokio::test]
#[traced_test]
async fn inline_text_skips_extraction() {
    let gateway = ScriptedGateway::new(|_, _| completion("## 方案"));
    let result = pipeline(gateway.clone()).process(text_request(1)).await.unwrap();

    assert_eq!(result.extracted_text, "客户想拓展欧洲市场");
    assert_eq!(result.primary.as_deref(), Some("## 方案"));
    assert!(result.secondary.is_none());

    let seen = gateway.seen();
    assert_eq!(seen.len(), 1);
    let (stage, request) = &seen[0];
    assert_eq!(*stage, Stage::Generation);
    assert_eq!(request.model, "test/generate");
    let prompt = user_text(request);
    assert!(prompt.contains("客户想拓展欧洲市场"));
    assert!(prompt.contains("套餐A: $100"));
    assert!(logs_contain("using provided transcript"));
}

#[tokio::test]
async fn extract_only_with_inline_text_makes_no_call() {
    let gateway = ScriptedGateway::new(|_, _| completion("unused"));
    let result = pipeline(gateway.clone()).process(text_request(0)).await.unwrap();

    assert_eq!(result.extracted_text, "客户想拓展欧洲市场");
    assert!(result.primary.is_none());
    assert!(result.secondary.is_none());
    assert_eq!(gateway.calls(), 0);
}

#[tokio::test]
async fn extract_only_with_audio_makes_exactly_one_call() {
    let gateway = ScriptedGateway::new(|stage, _| {
        assert_eq!(stage, Stage::Transcription);
        completion("说话人A：我们想进入欧洲")
    });
    let result = pipeline(gateway.clone()).process(audio_request(0)).await.unwrap();

    assert_eq!(result.extracted_text, "说话人A：我们想进入欧洲");
    assert!(result.primary.is_none());
    assert_eq!(gateway.calls(), 1);

    let (_, request) = &gateway.seen()[0];
    assert_eq!(request.model, "test/extract");
    match &request.messages[1].content {
        MessageContent::Parts(parts) => assert!(parts.iter().any(|p| matches!(
            p,
            ContentPart::ImageUrl { image_url } if image_url.url == "data:audio/mpeg;base64,aGVsbG8="
        ))),
        other => panic!("expected multi-part content, got {other:?}"),
    }
}

#[tokio::test]
async fn document_is_extracted_then_used_for_generation() {
    let gateway = ScriptedGateway::new(|stage, _| match stage {
        Stage::DocumentExtraction => completion("会议纪要：预算五万美元"),
        Stage::Generation => completion("# 报价方案"),
        Stage::Transcription => panic!("audio path must not run"),
    });
    let result = pipeline(gateway.clone())
        .process(GenerateQuoteRequest {
            document_base64: Some("JVBERg==".into()),
            document_type: Some("application/pdf".into()),
            price_list: Some("套餐A: $100".into()),
            ..Default::default()
        })
        .await
        .unwrap();

    assert_eq!(result.extracted_text, "会议纪要：预算五万美元");
    assert_eq!(result.primary.as_deref(), Some("# 报价方案"));

    let seen = gateway.seen();
    assert_eq!(seen.len(), 2);
    assert_eq!(seen[0].0, Stage::DocumentExtraction);
    assert_eq!(seen[1].0, Stage::Generation);
    assert!(user_text(&seen[1].1).contains("会议纪要：预算五万美元"));
}

#[tokio::test]
async fn extraction_failure_stops_before_generation() {
    let gateway = ScriptedGateway::new(|_, _| Ok(UpstreamReply::new(500, "decoder crashed")));
    let err = pipeline(gateway.clone()).process(audio_request(1)).await.unwrap_err();

    match err {
        ProposalError::Upstream { stage, status, body } => {
            assert_eq!(stage, Stage::Transcription);
            assert_eq!(status, 500);
            assert_eq!(body, "decoder crashed");
        }
        other => panic!("unexpected {other:?}"),
    }
    assert_eq!(gateway.calls(), 1);
}

// ── Generation ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn request_model_overrides_default() {
    let gateway = ScriptedGateway::new(|_, _| completion("ok"));
    let mut request = text_request(1);
    request.model = Some("openai/gpt-5".into());
    pipeline(gateway.clone()).process(request).await.unwrap();

    assert_eq!(gateway.seen()[0].1.model, "openai/gpt-5");
}

#[tokio::test]
async fn dual_generates_two_independent_variants() {
    let gateway = ScriptedGateway::new(|_, request| {
        if is_secondary(request) {
            completion("方案二")
        } else {
            completion("方案一")
        }
    });
    let result = pipeline(gateway.clone()).process(text_request(2)).await.unwrap();

    assert_eq!(result.primary.as_deref(), Some("方案一"));
    assert_eq!(result.secondary.as_deref(), Some("方案二"));
    assert_eq!(gateway.calls(), 2);
    let hinted = gateway.seen().iter().filter(|(_, r)| is_secondary(r)).count();
    assert_eq!(hinted, 1);
}

#[tokio::test]
async fn dual_failure_waits_for_both_and_returns_nothing_partial() {
    let gateway = ScriptedGateway::with_delay(Duration::from_millis(50), |_, request| {
        if is_secondary(request) {
            completion("方案二")
        } else {
            Ok(UpstreamReply::new(429, "too many requests"))
        }
    });
    let err = pipeline(gateway.clone()).process(text_request(2)).await.unwrap_err();

    assert!(matches!(err, ProposalError::RateLimited));
    assert_eq!(gateway.calls(), 2);
    assert_eq!(gateway.completed.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn secondary_failure_fails_the_request() {
    let gateway = ScriptedGateway::new(|_, request| {
        if is_secondary(request) {
            Ok(UpstreamReply::new(402, "payment required"))
        } else {
            completion("方案一")
        }
    });
    let err = pipeline(gateway).process(text_request(2)).await.unwrap_err();
    assert!(matches!(err, ProposalError::QuotaExhausted));
}

#[tokio::test]
async fn empty_generation_body_is_reported() {
    let gateway = ScriptedGateway::new(|_, _| Ok(UpstreamReply::new(200, "")));
    let err = pipeline(gateway).process(text_request(1)).await.unwrap_err();
    assert!(matches!(
        err,
        ProposalError::EmptyUpstreamResponse { stage: Stage::Generation }
    ));
}

#[tokio::test]
async fn transport_errors_propagate() {
    let gateway = ScriptedGateway::new(|stage, _| {
        Err(ProposalError::Transport {
            stage,
            message: "connection reset".into(),
        })
    });
    let err = pipeline(gateway).process(text_request(1)).await.unwrap_err();
    assert!(err.to_string().contains("connection reset"));
}
