// src/api/pages.rs — Static HTML pages

pub const HOME: &str = r#"
<h1>Parable Portal ✅</h1>
<p><a href="/dashboard">Go to Dashboard</a></p>
<p><a href="/chat">Go to Chat</a></p>
<p><a href="/ping">Ping Test</a></p>
"#;

pub const DASHBOARD: &str = r#"
<h1>Customer Dashboard</h1>
<ul>
  <li>📱 Smartphone Insurance: Active</li>
  <li>🛡️ Antivirus: Active</li>
  <li>🔒 VPN: Active</li>
  <li>🧾 Identity Guard: Active</li>
</ul>
<p><a href="/chat">Open Chatbot</a></p>
<p><a href="/">Back Home</a></p>
"#;

/// Chat client: posts to `/api/chat`, optional speech in and out.
pub const CHAT: &str = include_str!("../../assets/chat.html");
