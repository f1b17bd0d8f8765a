//! # Telemetry
//!
//! Service operations show up in the Prometheus exposition.

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use qna_core::{QnaApi, QnaConfig, QnaService, VoteDirection, VoteTarget};
    use qna_telemetry::{encode_metrics, init_telemetry, register_metrics, TelemetryConfig};

    use crate::integration::fixtures::{aid, qid, seeded_repository, u1, u2};

    #[tokio::test]
    async fn test_service_activity_is_exported() {
        // Another test may have registered first.
        let _ = register_metrics();

        let mut service = QnaService::new(QnaConfig::default(), Arc::new(seeded_repository()));
        service.load(&qid()).await.unwrap();
        service
            .vote(Some(&u2()), VoteTarget::Answer(aid("A1")), VoteDirection::Up)
            .await
            .unwrap();
        service.accept_answer(Some(&u1()), &aid("A1")).await.unwrap();
        let _ = service.vote(None, VoteTarget::Question(qid()), VoteDirection::Up).await;

        let text = encode_metrics().unwrap();
        assert!(text.contains("qna_votes_applied_total"));
        assert!(text.contains("qna_resolution_answers_accepted_total"));
        assert!(text.contains("qna_rejected_intents_total"));
        assert!(text.contains("qna_repository_round_trip_seconds"));
    }

    #[test]
    fn test_init_telemetry_without_console() {
        let config = TelemetryConfig::for_testing();
        // A subscriber may already be installed by another test.
        if let Ok(guard) = init_telemetry(config) {
            drop(guard);
        }
    }
}
