mod panel;

pub use panel::{Feedback, FeedbackKind, SearchPanel, SearchPhase, SearchRequest};

pub const EXAMPLE_PROMPTS: &[&str] = &[
    "Show me all job offers",
    "Get me rejection letters",
    "Find backend developer roles",
    "Show contract positions",
    "Get interviews from FAANG companies",
    "Find senior level opportunities",
];
