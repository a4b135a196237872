use tui_textarea::Input;

pub enum Event {
    ChatOpen(),
    KeyboardCharInput(Input),
    KeyboardCTRLC(),
    KeyboardCTRLO(),
    KeyboardEnter(),
    KeyboardPaste(String),
    MarkContext(u64, serde_json::Value),
    MarkSummary(u64, String),
    UIResize(),
    UIScrollDown(),
    UIScrollUp(),
    UIScrollPageDown(),
    UIScrollPageUp(),
    UITick(),
}
