//! End-to-end flows through the studio with a scripted provider


use std::sync::Arc;

use serde_json::json;
use studio_core::{
    AnalysisMode, AnalysisResult, BrandVoice, HistoryKind, MediaKind, QuotaGuard,
    RetirementInputs, Upload,
};
use studio_engine::{ActionError, ActionKind, ActionPhase, HistoryScope, MediaSlot};
use studio_llm::OutputKind;
use studio_store::{KeyValueStore, MemoryStore, Preferences};
use test_utils::{Harness, SCRIPT_MD};

#[tokio::test]
async fn test_script_is_parsed_shown_and_recorded() {
    let mut h = Harness::new(QuotaGuard::default()).await;

    let calls = &mut h.calls;
    let (result, _) = tokio::join!(h.studio.generate_script("pets"), async {
        calls.recv().await.unwrap().text(SCRIPT_MD)
    });

    let script = result.unwrap();
    assert_eq!(script.titles, vec!["Cat Video", "Dog Video"]);
    assert_eq!(script.description, "A fun video.");
    assert!(script.tags.is_empty());
    assert_eq!(h.studio.script().await, Some(script));

    let history = h.studio.history(HistoryScope::Generation).await;
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].kind, HistoryKind::Script);
    assert_eq!(h.studio.state(ActionKind::Script).await.phase, ActionPhase::Settled);
}

#[tokio::test]
async fn test_unparsable_script_fails_loudly() {
    let mut h = Harness::new(QuotaGuard::default()).await;

    let calls = &mut h.calls;
    let (result, _) = tokio::join!(h.studio.generate_script("pets"), async {
        calls.recv().await.unwrap().text("Sorry, I can't help with that.")
    });

    assert!(matches!(result, Err(ActionError::Provider { .. })));
    assert_eq!(h.studio.state(ActionKind::Script).await.phase, ActionPhase::Failed);
    assert_eq!(h.studio.usage().await.count, 0);
}

#[tokio::test]
async fn test_analysis_is_kept_per_mode_with_file_history() {
    let mut h = Harness::new(QuotaGuard::default()).await;

    let upload = Upload::file("notes.txt", "text/plain", b"Quarterly notes".to_vec());
    let calls = &mut h.calls;
    let (result, request) = tokio::join!(h.studio.analyze(AnalysisMode::Document, upload), async {
        let call = calls.recv().await.unwrap();
        let request = call.request.clone();
        call.json(json!({
            "summary": "Revenue grew",
            "keyPoints": ["Growth", "Hiring"],
        }));
        request
    });

    let result = result.unwrap();
    assert!(matches!(result, AnalysisResult::Document(_)));
    assert_eq!(result.summary(), "Revenue grew");

    assert_eq!(request.output, OutputKind::Json);
    assert!(request.response_schema.is_some());
    let media = request.media.expect("file sent inline");
    assert_eq!(media.mime_type, "text/plain");
    assert_eq!(media.bytes, b"Quarterly notes");

    assert_eq!(h.studio.analysis_result(AnalysisMode::Document).await, Some(result));
    assert_eq!(h.studio.analysis_result(AnalysisMode::SalesCall).await, None);
    assert!(h.studio.media_url(MediaSlot::Upload).await.is_some());

    let history = h.studio.history(HistoryScope::Analysis).await;
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].file_name.as_deref(), Some("notes.txt"));
    assert!(h.studio.history(HistoryScope::Generation).await.is_empty());
}

#[tokio::test]
async fn test_text_analysis_drops_previous_file_preview() {
    let mut h = Harness::new(QuotaGuard::default()).await;

    let upload = Upload::file("notes.txt", "text/plain", b"Quarterly notes".to_vec());
    let calls = &mut h.calls;
    let (result, _) = tokio::join!(h.studio.analyze(AnalysisMode::Document, upload), async {
        calls
            .recv()
            .await
            .unwrap()
            .json(json!({"summary": "Revenue grew", "keyPoints": []}))
    });
    assert!(result.is_ok());
    let file_url = h.studio.media_url(MediaSlot::Upload).await.unwrap();

    let calls = &mut h.calls;
    let (result, _) = tokio::join!(
        h.studio
            .analyze(AnalysisMode::Document, Upload::Text("Pasted memo".into())),
        async {
            calls
                .recv()
                .await
                .unwrap()
                .json(json!({"summary": "Short memo", "keyPoints": []}))
        }
    );
    assert!(result.is_ok());
    assert_eq!(h.studio.media_url(MediaSlot::Upload).await, None);
    assert_eq!(h.urls.revoked(), vec![file_url]);
}

#[tokio::test]
async fn test_malformed_analysis_is_rejected_at_the_boundary() {
    let mut h = Harness::new(QuotaGuard::default()).await;

    let calls = &mut h.calls;
    let (result, _) = tokio::join!(
        h.studio
            .analyze(AnalysisMode::SocialPost, Upload::Text("New drop Friday!".into())),
        async { calls.recv().await.unwrap().json(json!({"unexpected": true})) }
    );

    match result {
        Err(ActionError::Provider { message, .. }) => assert!(message.contains("Malformed")),
        other => panic!("expected malformed response error, got {other:?}"),
    }
    assert_eq!(h.studio.analysis_result(AnalysisMode::SocialPost).await, None);
    assert!(h.studio.history(HistoryScope::Analysis).await.is_empty());
    assert_eq!(h.studio.usage().await.count, 0);
}

#[tokio::test]
async fn test_second_speech_revokes_exactly_the_first_url() {
    let mut h = Harness::new(QuotaGuard::default()).await;

    let calls = &mut h.calls;
    let (first, _) = tokio::join!(h.studio.synthesize_speech("one", None), async {
        calls.recv().await.unwrap().binary("audio/wav", b"first")
    });
    assert_eq!(first.unwrap().kind, MediaKind::Audio);
    let first_url = h.studio.media_url(MediaSlot::Speech).await.unwrap();
    assert!(h.urls.revoked().is_empty());

    let calls = &mut h.calls;
    let (second, _) = tokio::join!(h.studio.synthesize_speech("two", Some("Puck")), async {
        let call = calls.recv().await.unwrap();
        assert_eq!(
            call.request.output,
            OutputKind::Audio {
                voice: Some("Puck".to_string())
            }
        );
        call.binary("audio/wav", b"second")
    });
    assert_eq!(second.unwrap().bytes, b"second");

    assert_eq!(h.urls.revoked(), vec![first_url]);
    let second_url = h.studio.media_url(MediaSlot::Speech).await.unwrap();
    assert_eq!(h.urls.created().last(), Some(&second_url));
}

#[tokio::test]
async fn test_wrong_media_type_is_an_error() {
    let mut h = Harness::new(QuotaGuard::default()).await;

    let calls = &mut h.calls;
    let (result, _) = tokio::join!(h.studio.generate_image("a cat", None), async {
        calls.recv().await.unwrap().text("no image for you")
    });

    assert!(matches!(result, Err(ActionError::Provider { .. })));
    assert_eq!(h.studio.media_url(MediaSlot::Image).await, None);
}

#[tokio::test]
async fn test_preferences_and_brand_voice_feed_requests() {
    let mut h = Harness::new(QuotaGuard::default()).await;

    h.studio
        .set_brand_voice(BrandVoice::new("Playful", "Gen Z gamers", ""))
        .await;
    h.studio
        .set_preferences(Preferences {
            selected_model: Some("gemini-2.5-pro".to_string()),
            aspect_ratio: "9:16".to_string(),
            voice: "Kore".to_string(),
        })
        .await;

    let calls = &mut h.calls;
    let (_, request) = tokio::join!(h.studio.generate_script("speedruns"), async {
        let call = calls.recv().await.unwrap();
        let request = call.request.clone();
        call.text(SCRIPT_MD);
        request
    });
    assert!(request.prompt.contains("Tone and Style: Playful."));
    assert!(request.prompt.contains("Target Audience: Gen Z gamers."));
    assert_eq!(request.model.as_deref(), Some("gemini-2.5-pro"));

    let calls = &mut h.calls;
    let (_, request) = tokio::join!(h.studio.generate_image("a cat", None), async {
        let call = calls.recv().await.unwrap();
        let request = call.request.clone();
        call.binary("image/png", b"png");
        request
    });
    assert_eq!(
        request.output,
        OutputKind::Image {
            aspect_ratio: Some("9:16".to_string())
        }
    );
    assert_eq!(request.model, None);
}

#[tokio::test]
async fn test_saved_state_survives_reopen() {
    let durable = Arc::new(MemoryStore::new());

    {
        let h = Harness::with_store(QuotaGuard::default(), durable.clone()).await;
        assert!(!h.studio.has_completed_tour().await);
        h.studio.complete_tour().await;
        h.studio
            .set_brand_voice(BrandVoice::new("Warm", "Parents", "We get it."))
            .await;
    }

    let h = Harness::with_store(QuotaGuard::default(), durable.clone()).await;
    assert!(h.studio.has_completed_tour().await);
    assert_eq!(h.studio.brand_voice().await.example, "We get it.");
    assert_eq!(h.studio.preferences().await, Preferences::default());

    let raw = durable.get_raw("brandVoice").await.unwrap().unwrap();
    let stored: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(stored["tone"], "Warm");
}

#[tokio::test]
async fn test_retirement_plan_round_trip() {
    let mut h = Harness::new(QuotaGuard::default()).await;

    let inputs = RetirementInputs {
        current_age: 35,
        retirement_age: 65,
        current_savings: 50_000.0,
        monthly_contribution: 800.0,
        expected_return_pct: 6.0,
        desired_annual_income: 60_000.0,
    };

    let calls = &mut h.calls;
    let (result, _) = tokio::join!(h.studio.plan_retirement(inputs), async {
        calls.recv().await.unwrap().json(json!({
            "projectedSavings": 910000.0,
            "monthlyContributionNeeded": 950.0,
            "onTrack": false,
            "summary": "Slightly behind",
            "recommendations": ["Raise contributions"],
        }))
    });

    let plan = result.unwrap();
    assert!(!plan.on_track);
    assert_eq!(h.studio.retirement_plan().await, Some(plan));
    assert_eq!(
        h.studio.history(HistoryScope::Generation).await[0].kind,
        HistoryKind::Retirement
    );
}

#[tokio::test]
async fn test_invalid_retirement_inputs_fail_fast() {
    let h = Harness::new(QuotaGuard::default()).await;

    let inputs = RetirementInputs {
        current_age: 70,
        retirement_age: 65,
        current_savings: 0.0,
        monthly_contribution: 0.0,
        expected_return_pct: 5.0,
        desired_annual_income: 40_000.0,
    };

    let result = h.studio.plan_retirement(inputs).await;
    assert!(matches!(result, Err(ActionError::Validation(_))));
    assert_eq!(h.provider.calls(), 0);
}

#[tokio::test]
async fn test_validated_key_is_kept_for_the_session() {
    let h = Harness::new(QuotaGuard::default()).await;

    assert!(matches!(
        h.studio.validate_api_key("  ").await,
        Err(ActionError::Validation(_))
    ));
    assert_eq!(h.studio.session_api_key().await, None);

    assert_eq!(h.studio.validate_api_key(" AIza-test ").await, Ok(true));
    assert_eq!(h.studio.session_api_key().await.as_deref(), Some("AIza-test"));
    assert_eq!(
        h.session.get_raw("apiKey").await.unwrap().as_deref(),
        Some("\"AIza-test\"")
    );
    assert_eq!(h.durable.get_raw("apiKey").await.unwrap(), None);
}

#[tokio::test]
async fn test_clear_history() {
    let mut h = Harness::new(QuotaGuard::default()).await;

    let calls = &mut h.calls;
    let (_, _) = tokio::join!(h.studio.improve_text("hi"), async {
        calls.recv().await.unwrap().text("Hi!")
    });
    assert_eq!(h.studio.history(HistoryScope::Generation).await.len(), 1);

    h.studio.clear_history(HistoryScope::Generation).await;
    assert!(h.studio.history(HistoryScope::Generation).await.is_empty());
    assert_eq!(h.durable.get_raw("generationHistory").await.unwrap().as_deref(), Some("[]"));
}
