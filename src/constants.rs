pub const MODEL_API_KEY_ENV_NAME: &str = "DECKGEN_MODEL_API_KEY";

pub const SESSION_COOKIE_NAME: &str = "deckgen_session";

pub const DEFAULT_MAX_TOKENS: u32 = 1500;

pub const DEFAULT_SESSION_IDLE_MINUTES: u32 = 60;

pub const SESSION_SWEEP_INTERVAL: std::time::Duration = std::time::Duration::from_secs(60);

pub const DEFAULT_BIND_ADDRESS: &str = "127.0.0.1:8000";

pub const DECK_FILE_NAME: &str = "presentation.pptx";

pub const PPTX_MIME_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.presentationml.presentation";

pub(crate) const THINK_STRIPPER: &str = r"<think>[\s\S]*</think>\s*";

/// Matches a slide header line such as `Slide 3: Intro`, `Slide 3 - Intro` or `**Slide 3:** Intro`.
/// Leading `#` and emphasis wrapping the whole line are removed before matching. Whether the
/// word `Slide` is followed by a number, a separator or nothing is checked by the caller.
pub(crate) const SLIDE_HEADER: &str = r"(?i)^(?P<open>[*_]*)\s*slide\s*(?P<number>\d+)?\s*(?P<close>[*_]*)\s*(?P<separator>[:.)\-–—])?\s*(?P<title>.*)$";

pub(crate) const BULLET_MARKERS: [char; 3] = ['-', '*', '•'];

pub(crate) const EMPHASIS_MARKERS: [&str; 5] = ["***", "**", "__", "*", "_"];

pub(crate) const DEFAULT_USER_PROMPT: &str =
    "Create a presentation summarising the following document.";

pub(crate) const DEFAULT_PROMPT_TEMPLATE: &str = r#"
You are preparing a slide deck.
Instruction from the author: {prompt}

Answer only with slides in exactly this format, one blank line between slides:

Slide 1: <title>
<one short subtitle line>
- <bullet>
- <bullet>

Do not add any text before the first slide or after the last one.
Document:
{text}"#;
