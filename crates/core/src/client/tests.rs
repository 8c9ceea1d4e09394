use std::time::Duration;

use little_chat_model::{Credential, ErrorKind, ModelMessage, Role};
use little_chat_test_model::{PresetResponse, TestModelProvider};
use tokio::task::yield_now;
use tokio::time::timeout;

use crate::{ChatClient, ChatClientBuilder, ChatStage, NO_RESPONSE, SubmitError};

fn credential() -> Credential {
    Credential::from("sk-test")
}

async fn wait_for_stage(client: &ChatClient, stage: ChatStage) {
    timeout(Duration::from_secs(1), async {
        while client.stage() != stage {
            yield_now().await;
        }
    })
    .await
    .unwrap();
}

#[tokio::test]
async fn test_simple_message() {
    let mut model_provider = TestModelProvider::default();
    model_provider.add_response(PresetResponse::reply("Hi there"));

    let client =
        ChatClientBuilder::with_model_provider(model_provider.clone()).build();
    let reply = client
        .submit(&credential(), "gpt-3.5-turbo", "Hello")
        .await
        .unwrap();
    assert_eq!(reply, "Hi there");

    let transcript = client.transcript();
    assert_eq!(
        transcript.messages(),
        [ModelMessage::user("Hello"), ModelMessage::assistant("Hi there")]
    );

    let requests = model_provider.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].credential.expose(), "sk-test");
    assert_eq!(requests[0].request.model, "gpt-3.5-turbo");
    assert_eq!(requests[0].request.messages, [ModelMessage::user("Hello")]);
    assert_eq!(client.stage(), ChatStage::Idle);
}

#[tokio::test]
async fn test_transcript_grows_by_two_per_exchange() {
    let replies = ["one", "two", "three"];
    let mut model_provider = TestModelProvider::default();
    for reply in replies {
        model_provider.add_response(PresetResponse::reply(reply));
    }

    let client =
        ChatClientBuilder::with_model_provider(model_provider.clone()).build();
    for (turn, expected) in replies.iter().enumerate() {
        let reply = client
            .submit(&credential(), "test", &format!("question {turn}"))
            .await
            .unwrap();
        assert_eq!(reply, *expected);
        assert_eq!(client.transcript().len(), 2 * (turn + 1));
    }

    let transcript = client.transcript();
    for (idx, msg) in transcript.iter().enumerate() {
        let expected_role =
            if idx % 2 == 0 { Role::User } else { Role::Assistant };
        assert_eq!(msg.role(), expected_role);
    }

    // Every request carries the whole history up to the new user message.
    let requests = model_provider.requests();
    assert_eq!(requests[2].request.messages.len(), 5);
    assert_eq!(requests[2].request.messages[..4], transcript.messages()[..4]);
}

#[tokio::test]
async fn test_empty_choices_use_sentinel() {
    let mut model_provider = TestModelProvider::default();
    model_provider.add_response(PresetResponse::NoChoices);

    let client = ChatClientBuilder::with_model_provider(model_provider).build();
    let reply = client.submit(&credential(), "test", "Hello").await.unwrap();
    assert_eq!(reply, NO_RESPONSE);
    assert_eq!(
        client.transcript().last(),
        Some(&ModelMessage::assistant(NO_RESPONSE))
    );
}

#[tokio::test]
async fn test_failure_keeps_user_message() {
    for kind in [
        ErrorKind::Encoding,
        ErrorKind::Transport,
        ErrorKind::Status,
        ErrorKind::RateLimitExceeded,
        ErrorKind::Decoding,
    ] {
        let mut model_provider = TestModelProvider::default();
        model_provider.add_response(PresetResponse::Failure(kind));

        let client =
            ChatClientBuilder::with_model_provider(model_provider).build();
        let err = client
            .submit(&credential(), "test", "Hello")
            .await
            .unwrap_err();
        assert_eq!(err.kind(), Some(kind));
        assert!(!err.to_string().is_empty());

        assert_eq!(client.transcript().messages(), [ModelMessage::user("Hello")]);
        assert_eq!(client.stage(), ChatStage::Idle);
    }
}

#[tokio::test]
async fn test_invalid_endpoint_leaves_transcript_untouched() {
    let mut model_provider = TestModelProvider::default();
    model_provider.add_response(PresetResponse::reply("Hi"));
    model_provider
        .add_response(PresetResponse::Failure(ErrorKind::InvalidEndpoint));

    let client = ChatClientBuilder::with_model_provider(model_provider).build();
    client.submit(&credential(), "test", "Hello").await.unwrap();
    let before = client.transcript();

    let err = client
        .submit(&credential(), "test", "Again")
        .await
        .unwrap_err();
    assert_eq!(err.kind(), Some(ErrorKind::InvalidEndpoint));
    assert_eq!(client.transcript(), before);
    assert_eq!(client.stage(), ChatStage::Idle);
}

#[tokio::test]
async fn test_dangling_user_message_is_resent() {
    let mut model_provider = TestModelProvider::default();
    model_provider.add_response(PresetResponse::Failure(ErrorKind::Transport));
    model_provider.add_response(PresetResponse::reply("Sorry, I missed that"));

    let client =
        ChatClientBuilder::with_model_provider(model_provider.clone()).build();
    client
        .submit(&credential(), "test", "First")
        .await
        .unwrap_err();
    client.submit(&credential(), "test", "Second").await.unwrap();

    let requests = model_provider.requests();
    assert_eq!(
        requests[1].request.messages,
        [ModelMessage::user("First"), ModelMessage::user("Second")]
    );
    assert_eq!(client.transcript().len(), 3);
}

#[tokio::test]
async fn test_rollback_on_failure() {
    let mut model_provider = TestModelProvider::default();
    model_provider.add_response(PresetResponse::reply("Hi"));
    model_provider.add_response(PresetResponse::Failure(ErrorKind::Status));

    let client = ChatClientBuilder::with_model_provider(model_provider)
        .rollback_on_failure(true)
        .build();
    client.submit(&credential(), "test", "Hello").await.unwrap();
    let before = client.transcript();

    client
        .submit(&credential(), "test", "Again")
        .await
        .unwrap_err();
    assert_eq!(client.transcript(), before);
}

#[tokio::test]
async fn test_busy_while_awaiting_reply() {
    let mut model_provider = TestModelProvider::default();
    model_provider.add_response(PresetResponse::reply("Done"));
    model_provider.set_delay(Duration::from_millis(100));

    let client = ChatClientBuilder::with_model_provider(model_provider).build();
    let first = tokio::spawn({
        let client = client.clone();
        async move { client.submit(&credential(), "test", "First").await }
    });
    wait_for_stage(&client, ChatStage::AwaitingReply).await;

    let err = client
        .submit(&credential(), "test", "Second")
        .await
        .unwrap_err();
    assert!(matches!(err, SubmitError::Busy));
    assert_eq!(client.transcript().messages(), [ModelMessage::user("First")]);

    assert_eq!(first.await.unwrap().unwrap(), "Done");
    assert_eq!(client.transcript().len(), 2);
}

#[tokio::test]
async fn test_cancel_pending_exchange() {
    let mut model_provider = TestModelProvider::default();
    model_provider.add_response(PresetResponse::reply("Too late"));
    model_provider.add_response(PresetResponse::reply("Just in time"));
    model_provider.set_delay(Duration::from_millis(200));

    let client = ChatClientBuilder::with_model_provider(model_provider).build();
    assert!(!client.cancel());

    let pending = tokio::spawn({
        let client = client.clone();
        async move { client.submit(&credential(), "test", "First").await }
    });
    wait_for_stage(&client, ChatStage::AwaitingReply).await;

    assert!(client.cancel());
    let err = pending.await.unwrap().unwrap_err();
    assert!(matches!(err, SubmitError::Cancelled));
    assert_eq!(client.stage(), ChatStage::Idle);
    assert_eq!(client.transcript().messages(), [ModelMessage::user("First")]);

    // The client is usable again.
    let reply = client.submit(&credential(), "test", "Second").await.unwrap();
    assert_eq!(reply, "Just in time");
}

#[tokio::test]
async fn test_cancel_with_rollback() {
    let mut model_provider = TestModelProvider::default();
    model_provider.add_response(PresetResponse::reply("Too late"));
    model_provider.set_delay(Duration::from_millis(200));

    let client = ChatClientBuilder::with_model_provider(model_provider)
        .rollback_on_failure(true)
        .build();
    let pending = tokio::spawn({
        let client = client.clone();
        async move { client.submit(&credential(), "test", "First").await }
    });
    wait_for_stage(&client, ChatStage::AwaitingReply).await;

    client.cancel();
    pending.await.unwrap().unwrap_err();
    assert!(client.transcript().is_empty());
}

#[tokio::test]
async fn test_dropping_submit_returns_to_idle() {
    let mut model_provider = TestModelProvider::default();
    model_provider.add_response(PresetResponse::reply("Never seen"));
    model_provider.set_delay(Duration::from_secs(5));

    let client = ChatClientBuilder::with_model_provider(model_provider).build();
    let result = timeout(
        Duration::from_millis(20),
        client.submit(&credential(), "test", "Hello"),
    )
    .await;
    assert!(result.is_err());

    assert_eq!(client.stage(), ChatStage::Idle);
    assert_eq!(client.transcript().messages(), [ModelMessage::user("Hello")]);
}

#[tokio::test]
async fn test_system_prompt_and_reset() {
    let mut model_provider = TestModelProvider::default();
    model_provider.add_response(PresetResponse::reply("Noted"));
    model_provider.add_response(PresetResponse::reply("Unused"));

    let client = ChatClientBuilder::with_model_provider(model_provider.clone())
        .with_system_prompt("You take meeting notes.")
        .build();
    assert_eq!(client.transcript().len(), 1);

    client.submit(&credential(), "test", "Hello").await.unwrap();
    let requests = model_provider.requests();
    assert_eq!(
        requests[0].request.messages,
        [
            ModelMessage::system("You take meeting notes."),
            ModelMessage::user("Hello"),
        ]
    );
    assert_eq!(client.transcript().len(), 3);

    client.reset();
    assert_eq!(
        client.transcript().messages(),
        [ModelMessage::system("You take meeting notes.")]
    );

    // After a reset the script starts over from the first user turn.
    let reply = client.submit(&credential(), "test", "Hi again").await.unwrap();
    assert_eq!(reply, "Noted");
}

#[tokio::test]
async fn test_reset_cancels_pending_exchange() {
    let mut model_provider = TestModelProvider::default();
    model_provider.add_response(PresetResponse::reply("Stale"));
    model_provider.set_delay(Duration::from_millis(200));

    let client = ChatClientBuilder::with_model_provider(model_provider).build();
    let pending = tokio::spawn({
        let client = client.clone();
        async move { client.submit(&credential(), "test", "Hello").await }
    });
    wait_for_stage(&client, ChatStage::AwaitingReply).await;

    client.reset();
    let err = pending.await.unwrap().unwrap_err();
    assert!(matches!(err, SubmitError::Cancelled));
    assert!(client.transcript().is_empty());
}
