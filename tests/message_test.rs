use serde_json::json;
use tabmonitor::types::jpeg_data_url;
use tabmonitor::{ContentPart, Message, MessageContent, Role};

#[test]
fn test_message_constructors() {
    let sys = Message::system("You are helpful");
    assert!(matches!(sys.role, Role::System));

    let user = Message::user("Hello");
    assert!(matches!(user.role, Role::User));

    let asst = Message::assistant("Hi there!");
    assert!(matches!(asst.role, Role::Assistant));
}

#[test]
fn test_message_content_text() {
    let msg = Message::user("test content");
    assert_eq!(msg.content, MessageContent::Text("test content".to_string()));
    assert_eq!(msg.content.as_text(), Some("test content"));
    assert!(!msg.content.has_image());
}

#[test]
fn test_text_message_serialization() {
    let value = serde_json::to_value(Message::system("be brief")).unwrap();
    assert_eq!(value, json!({"role": "system", "content": "be brief"}));
}

#[test]
fn test_image_message_serialization() {
    let msg = Message::user_with_image("describe", jpeg_data_url("QUJD"));
    assert!(msg.content.has_image());
    assert_eq!(msg.content.as_text(), Some("describe"));

    let value = serde_json::to_value(&msg).unwrap();
    assert_eq!(
        value,
        json!({
            "role": "user",
            "content": [
                {"type": "text", "text": "describe"},
                {"type": "image_url", "image_url": {"url": "data:image/jpeg;base64,QUJD"}}
            ]
        })
    );
}

#[test]
fn test_parts_deserialize() {
    let msg: Message = serde_json::from_value(json!({
        "role": "user",
        "content": [{"type": "image_url", "image_url": {"url": "https://x.example/a.png"}}]
    }))
    .unwrap();
    match msg.content {
        MessageContent::Parts(parts) => {
            assert!(matches!(&parts[0], ContentPart::ImageUrl { image_url } if image_url.url == "https://x.example/a.png"));
        }
        MessageContent::Text(_) => panic!("expected parts"),
    }
}
