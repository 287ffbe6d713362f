//! Server-rendered chat page. The embedded script mirrors the optimistic
//! flow: on submit it mints the message/response ids, overlays the pending
//! pair (user bubble plus an empty bot placeholder), threads the same ids
//! through the action form, and re-renders from the server once the request
//! settles, so the confirmed pair replaces the preview under the same ids.

use crate::models::chat::{Conversation, Sender};

pub fn render(conversation: &Conversation) -> String {
    let mut bubbles = String::new();
    for message in &conversation.messages {
        let class = match message.sender {
            Sender::User => "user",
            Sender::Bot => "bot",
        };
        bubbles.push_str(&format!(
            "      <div class=\"bubble {}\" data-id=\"{}\">{}</div>\n",
            class,
            message.id,
            escape_html(&message.content)
        ));
    }

    format!(
        r#"<!doctype html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <title>Chatbot</title>
  <style>
    body {{ font-family: sans-serif; max-width: 40rem; margin: 0 auto; padding: 1rem; }}
    .messages {{ display: flex; flex-direction: column; gap: .5rem; min-height: 60vh; }}
    .bubble {{ padding: .5rem .75rem; border-radius: .75rem; max-width: 80%; white-space: pre-wrap; }}
    .bubble.user {{ align-self: flex-end; background: #2563eb; color: #fff; }}
    .bubble.bot {{ align-self: flex-start; background: #e5e7eb; }}
    .bubble.bot:empty::after {{ content: "…"; }}
    form {{ display: flex; gap: .5rem; margin-top: 1rem; }}
    textarea {{ flex: 1; resize: none; }}
  </style>
</head>
<body>
  <form method="post" action="/api/chat" id="reset-form">
    <input type="hidden" name="actionType" value="reset-chat">
    <button type="submit">Reset chat</button>
  </form>
  <div class="messages" id="messages">
{bubbles}  </div>
  <form method="post" action="/api/chat" id="message-form">
    <input type="hidden" name="actionType" value="send-message">
    <textarea name="message" rows="2" placeholder="Type a message..." required></textarea>
    <button type="submit">Send</button>
  </form>
  <script>
    const form = document.getElementById("message-form");
    const messages = document.getElementById("messages");

    function addBubble(kind, id, text) {{
      const bubble = document.createElement("div");
      bubble.className = "bubble " + kind;
      bubble.dataset.id = id;
      bubble.textContent = text;
      messages.appendChild(bubble);
    }}

    form.addEventListener("submit", async (event) => {{
      event.preventDefault();
      const data = new FormData(form);
      const text = data.get("message");
      if (typeof text !== "string" || text.trim() === "") return;

      const messageId = crypto.randomUUID();
      const responseId = crypto.randomUUID();
      data.set("messageId", messageId);
      data.set("messageTimestamp", new Date().toISOString());
      data.set("responseId", responseId);

      addBubble("user", messageId, text);
      addBubble("bot", responseId, "");
      form.reset();

      await fetch("/api/chat", {{ method: "POST", body: new URLSearchParams(data) }});
      window.location.reload();
    }});
  </script>
</body>
</html>
"#
    )
}

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::chat::Message;

    #[test]
    fn page_contains_one_bubble_per_message() {
        let mut conversation = Conversation::empty();
        conversation.push(Message::new("hello", Sender::User));
        conversation.push(Message::new("hi there", Sender::Bot));

        let html = render(&conversation);
        assert_eq!(html.matches("class=\"bubble user\"").count(), 1);
        assert_eq!(html.matches("class=\"bubble bot\"").count(), 1);
        assert!(html.contains("hello"));
        assert!(html.contains("hi there"));
    }

    #[test]
    fn message_content_is_escaped() {
        let mut conversation = Conversation::empty();
        conversation.push(Message::new("<script>alert(1)</script>", Sender::User));

        let html = render(&conversation);
        assert!(!html.contains("<script>alert(1)</script>"));
        assert!(html.contains("&lt;script&gt;"));
    }
}
