//! # Failure Handling
//!
//! A failed intent must leave the cached page exactly as it was:
//!
//! - Transport errors on every mutating operation
//! - Anonymous intents, which never reach the backend
//! - Refresh failures after a successful submit

#[cfg(test)]
mod tests {
    use qna_core::{
        Intent, QnaApi, QnaConfig, QnaError, QnaService, VoteDirection, VoteTarget,
    };

    use crate::integration::fixtures::{aid, flaky, qid, u1, u2, FlakyRepository, Operation};

    async fn open_page() -> (std::sync::Arc<FlakyRepository>, QnaService<FlakyRepository>) {
        let backend = flaky();
        let mut service = QnaService::new(QnaConfig::default(), backend.clone());
        service.load(&qid()).await.unwrap();
        (backend, service)
    }

    /// Snapshot of everything a view could render.
    fn snapshot(
        service: &QnaService<FlakyRepository>,
    ) -> (qna_core::Question, Vec<qna_core::Answer>) {
        (service.question().cloned().unwrap(), service.answers().to_vec())
    }

    #[tokio::test]
    async fn test_vote_transport_failure_is_noop() {
        let (backend, mut service) = open_page().await;
        backend.fail(Operation::VoteAnswer);
        backend.fail(Operation::VoteQuestion);
        let before = snapshot(&service);

        let on_answer = service
            .vote(Some(&u2()), VoteTarget::Answer(aid("A1")), VoteDirection::Up)
            .await;
        let on_question = service
            .vote(Some(&u2()), VoteTarget::Question(qid()), VoteDirection::Down)
            .await;

        assert!(matches!(on_answer, Err(QnaError::Transport(_))));
        assert!(matches!(on_question, Err(QnaError::Transport(_))));
        assert_eq!(snapshot(&service), before);
    }

    #[tokio::test]
    async fn test_accept_transport_failure_is_noop() {
        let (backend, mut service) = open_page().await;
        backend.fail(Operation::ResolveQuestion);
        let before = snapshot(&service);

        let result = service.accept_answer(Some(&u1()), &aid("A1")).await;
        assert!(matches!(result, Err(QnaError::Transport(_))));
        assert_eq!(snapshot(&service), before);

        // The author may retry once the backend is back.
        backend.recover(Operation::ResolveQuestion);
        service.accept_answer(Some(&u1()), &aid("A1")).await.unwrap();
        assert!(service.question().unwrap().is_resolved);
    }

    #[tokio::test]
    async fn test_helpful_transport_failure_is_noop() {
        let (backend, mut service) = open_page().await;
        backend.fail(Operation::MarkHelpful);
        let before = snapshot(&service);

        let result = service.toggle_helpful(Some(&u2()), &aid("A2")).await;
        assert!(matches!(result, Err(QnaError::Transport(_))));
        assert_eq!(snapshot(&service), before);
    }

    #[tokio::test]
    async fn test_create_failure_keeps_draft() {
        let (backend, mut service) = open_page().await;
        backend.fail(Operation::CreateAnswer);
        service.view_mut().open_reply_form(aid("A1"));
        service.view_mut().set_draft_content("will not arrive");
        let before = snapshot(&service);

        let result = service.submit_draft(Some(&u2())).await;
        assert!(matches!(result, Err(QnaError::Transport(_))));
        assert_eq!(snapshot(&service), before);
        assert_eq!(
            service.view().draft.as_ref().map(|d| d.content.as_str()),
            Some("will not arrive")
        );
    }

    #[tokio::test]
    async fn test_refresh_failure_after_submit_keeps_created_answer() {
        let (backend, mut service) = open_page().await;
        backend.fail(Operation::ListAnswers);

        let created = service
            .submit_answer(Some(&u2()), "Try a oneshot channel.", None)
            .await
            .unwrap();

        assert!(service.threads().find(&created.id).is_some());
        assert!(backend.inner().answer(&created.id).is_some());
    }

    #[tokio::test]
    async fn test_load_failure_keeps_previous_page() {
        let (backend, mut service) = open_page().await;
        backend.fail(Operation::ListAnswers);
        let before = snapshot(&service);

        let result = service.load(&qid()).await;
        assert!(matches!(result, Err(QnaError::Transport(_))));
        assert_eq!(snapshot(&service), before);
    }

    #[tokio::test]
    async fn test_anonymous_intents_never_reach_backend() {
        let (backend, mut service) = open_page().await;
        let calls = backend.inner().call_count();

        let vote = service
            .vote(None, VoteTarget::Answer(aid("A1")), VoteDirection::Up)
            .await;
        let accept = service.accept_answer(None, &aid("A1")).await;
        let helpful = service.toggle_helpful(None, &aid("A1")).await;
        let reply = service.submit_answer(None, "hi", Some(&aid("A1"))).await;

        assert_eq!(vote, Err(QnaError::Unauthenticated));
        assert_eq!(accept, Err(QnaError::Unauthenticated));
        assert_eq!(helpful, Err(QnaError::Unauthenticated));
        assert_eq!(reply, Err(QnaError::Unauthenticated));
        assert_eq!(backend.inner().call_count(), calls);
    }

    #[tokio::test]
    async fn test_user_notices() {
        let (_, mut service) = open_page().await;

        let vote = service
            .vote(None, VoteTarget::Answer(aid("A1")), VoteDirection::Up)
            .await
            .unwrap_err();
        let notice = vote.user_notice(Intent::Vote);
        assert_eq!(notice.message, "Please login to vote");
        assert!(notice.blocking);

        let accept = service
            .accept_answer(Some(&u2()), &aid("A1"))
            .await
            .unwrap_err();
        assert_eq!(
            accept.user_notice(Intent::Accept).message,
            "Only the question author can mark it as resolved"
        );

        let transport = QnaError::Transport("down".into()).user_notice(Intent::MarkHelpful);
        assert_eq!(transport.message, "Action failed, try again");
        assert!(!transport.blocking);
    }
}
