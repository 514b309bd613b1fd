/// Model ID constants used when a caller leaves the model empty on a probe
pub mod models {
    pub mod google {
        /// Stable model substituted by the Gemini adapter when none is supplied
        pub const DEFAULT_MODEL: &str = GEMINI_2_0_FLASH;
        pub const GEMINI_2_0_FLASH: &str = "gemini-2.0-flash";
    }

    pub mod openai {
        pub const DEFAULT_MODEL: &str = GPT_4O_MINI;
        pub const GPT_4O_MINI: &str = "gpt-4o-mini";
    }

    pub mod anthropic {
        pub const DEFAULT_MODEL: &str = CLAUDE_3_5_HAIKU_LATEST;
        pub const CLAUDE_3_5_HAIKU_LATEST: &str = "claude-3-5-haiku-latest";
    }
}

/// Default configuration values
pub mod defaults {
    use super::models;

    pub const DEFAULT_PROVIDER: &str = "openai";
    pub const DEFAULT_MODEL: &str = models::openai::DEFAULT_MODEL;
    pub const DEFAULT_CATEGORY: &str = "html-games";
    pub const DEFAULT_VERBOSITY: &str = "standard";
    pub const DEFAULT_USER_AGENT: &str = "promptforge/0.1.0";
    pub const CONFIG_FILE_NAME: &str = "promptforge.toml";
    pub const CONFIG_DIR_NAME: &str = "promptforge";

    /// Output ceiling for Anthropic generations
    pub const ANTHROPIC_MAX_TOKENS: u32 = 1_000;
    /// Output ceiling for connectivity probes on every provider
    pub const PROBE_MAX_TOKENS: u32 = 1;
    pub const PROBE_PROMPT: &str = "ping";
}

/// Message role constants to avoid hardcoding strings
pub mod message_roles {
    pub const SYSTEM: &str = "system";
    pub const USER: &str = "user";
}

/// URL constants for API endpoints
pub mod urls {
    pub const OPENAI_CHAT_COMPLETIONS: &str = "https://api.openai.com/v1/chat/completions";
    pub const ANTHROPIC_MESSAGES: &str = "https://api.anthropic.com/v1/messages";
    pub const ANTHROPIC_API_VERSION: &str = "2023-06-01";
    pub const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";
    pub const CHAT_COMPLETIONS_PATH: &str = "/chat/completions";
}

/// Environment variables consulted for provider credentials
pub mod env {
    pub const OPENAI_API_KEY: &str = "OPENAI_API_KEY";
    pub const ANTHROPIC_API_KEY: &str = "ANTHROPIC_API_KEY";
    pub const GEMINI_API_KEY: &str = "GEMINI_API_KEY";
    pub const GOOGLE_API_KEY: &str = "GOOGLE_API_KEY";
    pub const OPENAI_COMPATIBLE_API_KEY: &str = "OPENAI_COMPATIBLE_API_KEY";
}

/// Server-sent events framing used by OpenAI-style and Gemini streams
pub mod sse {
    pub const DATA_PREFIX: &str = "data: ";
    pub const DONE_SENTINEL: &str = "[DONE]";
}
