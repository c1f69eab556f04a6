//! Server-rendered chat UI. One page, no build step: the HTML, styles and
//! script ship as a single string.

/// Render the chat page served at the root path.
pub fn render_chat() -> String {
    build_page("Property Search", CHAT_BODY)
}

const CHAT_BODY: &str = r#"<div class="page">
    <div class="welcome" id="welcome">
        <h1>Property Search</h1>
        <p>Describe your ideal property and I'll help you find it</p>
    </div>
    <div class="messages" id="messages"></div>
    <div class="status" id="status-line">Searching for properties&hellip;</div>
    <div class="clear-row" id="clear-row">
        <button id="clear-button">Clear chat</button>
    </div>
</div>
<div class="composer">
    <form id="composer-form" autocomplete="off">
        <input id="query-input" type="text" maxlength="2000" placeholder="">
        <button type="submit">Send</button>
    </form>
</div>
<script src="https://cdn.jsdelivr.net/npm/marked/marked.min.js"></script>
<script>
const EXAMPLE_QUERIES = [
    '3 bedroom house in Manchester under £400k with a garden',
    'Modern 2-bed flat in London Zone 2, max budget £600k',
    'Family home near good schools in Bristol, 4+ bedrooms',
    'Victorian terraced house in Edinburgh under £350k',
    'Detached property with parking in Leeds, £300-500k',
    '2 bed apartment in Birmingham city centre',
    'Cottage in the Cotswolds with countryside views',
    'New build 3-bed semi in Cardiff under £300k',
];

let sessionId = null;
let placeholderIndex = 0;

const input = document.getElementById('query-input');
const messages = document.getElementById('messages');
const welcome = document.getElementById('welcome');
const statusLine = document.getElementById('status-line');
const clearRow = document.getElementById('clear-row');

function cyclePlaceholder() {
    input.placeholder = 'e.g. ' + EXAMPLE_QUERIES[placeholderIndex];
    placeholderIndex = (placeholderIndex + 1) % EXAMPLE_QUERIES.length;
}
cyclePlaceholder();
setInterval(cyclePlaceholder, 3000);

function addBubble(role, text) {
    const bubble = document.createElement('div');
    bubble.className = 'bubble ' + role;
    if (role === 'assistant') {
        bubble.innerHTML = marked.parse(text);
    } else {
        bubble.textContent = text;
    }
    messages.appendChild(bubble);
    welcome.style.display = 'none';
    clearRow.style.display = 'block';
    bubble.scrollIntoView({ behavior: 'smooth', block: 'end' });
}

async function sendQuery(event) {
    event.preventDefault();
    const query = input.value.trim();
    if (!query) return;
    input.value = '';
    addBubble('user', query);
    statusLine.style.display = 'block';
    try {
        const resp = await fetch('/api/chat', {
            method: 'POST',
            headers: { 'Content-Type': 'application/json' },
            body: JSON.stringify({ session_id: sessionId, query: query }),
        });
        const data = await resp.json();
        if (resp.ok) {
            sessionId = data.session_id;
            addBubble('assistant', data.reply);
        } else {
            addBubble('assistant', '**Sorry.** ' + (data.detail || 'Something went wrong.'));
        }
    } catch (err) {
        addBubble('assistant', '**Sorry.** The search service is unreachable.');
    } finally {
        statusLine.style.display = 'none';
    }
}

async function clearChat() {
    if (sessionId) {
        try { await fetch('/api/chat/' + sessionId, { method: 'DELETE' }); } catch (err) {}
        sessionId = null;
    }
    messages.innerHTML = '';
    welcome.style.display = '';
    clearRow.style.display = 'none';
}

document.getElementById('composer-form').addEventListener('submit', sendQuery);
document.getElementById('clear-button').addEventListener('click', clearChat);
</script>
"#;

fn build_page(title: &str, content: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{title} — Hearth</title>
<link href="https://fonts.googleapis.com/css2?family=Rubik:wght@400;500;600&display=swap" rel="stylesheet">
<style>
*{{margin:0;padding:0;box-sizing:border-box;}}
body{{font-family:'Rubik',-apple-system,BlinkMacSystemFont,sans-serif;background:#CAD2C5;color:#2F3E46;}}
.page{{max-width:760px;margin:0 auto;padding:24px 16px 120px;}}
.welcome{{text-align:center;padding:96px 16px 32px;}}
.welcome h1{{font-size:34px;font-weight:600;margin-bottom:8px;}}
.welcome p{{font-size:17px;color:#354F52;}}
.messages{{display:flex;flex-direction:column;gap:12px;}}
.bubble{{max-width:85%;padding:12px 16px;border-radius:14px;line-height:1.5;font-size:15px;overflow-wrap:break-word;}}
.bubble.user{{background:#52796F;color:#CAD2C5;align-self:flex-end;border-bottom-right-radius:4px;}}
.bubble.assistant{{background:#84A98C;color:#2F3E46;align-self:flex-start;border-bottom-left-radius:4px;}}
.bubble.assistant a{{color:#2F3E46;font-weight:600;}}
.bubble.assistant hr{{border:none;border-top:1px solid #52796F;opacity:0.4;margin:10px 0;}}
.bubble.assistant em{{color:#354F52;}}
.status{{display:none;font-size:14px;color:#354F52;text-align:center;padding:12px;}}
.clear-row{{display:none;text-align:center;margin-top:16px;}}
.clear-row button{{background:none;border:1px solid #52796F;color:#52796F;padding:6px 16px;border-radius:16px;font-size:13px;font-family:inherit;cursor:pointer;}}
.clear-row button:hover{{background:#52796F;color:#CAD2C5;}}
.composer{{position:fixed;bottom:0;left:0;right:0;background:linear-gradient(transparent,#CAD2C5 40%);padding:24px 16px 20px;}}
.composer form{{display:flex;gap:8px;max-width:760px;margin:0 auto;}}
.composer input{{flex:1;padding:14px 18px;font-size:15px;font-family:inherit;color:#2F3E46;background:#fff;border:1px solid #84A98C;border-radius:24px;outline:none;}}
.composer input:focus{{border-color:#52796F;}}
.composer input::placeholder{{color:#354F52;opacity:0.6;}}
.composer button{{background:#52796F;color:#CAD2C5;border:none;border-radius:24px;padding:0 22px;font-size:15px;font-family:inherit;font-weight:500;cursor:pointer;}}
.composer button:hover{{background:#354F52;}}
</style>
</head>
<body>
{content}
</body>
</html>"#,
        title = html_escape(title),
    )
}

fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
