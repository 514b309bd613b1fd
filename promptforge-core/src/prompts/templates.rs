//! System instruction templates
//!
//! The instruction handed to every provider is assembled from three fixed
//! pieces: a base role statement, a focus clause for the application
//! category and a clause describing how verbose the generated prompt may be.
//! Nothing here performs I/O, so the same inputs always yield the same text.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

const BASE_PROMPT: &str = "You are an expert software developer specializing in creating detailed and comprehensive prompts for application development. Your task is to enhance and expand the user's app description into a detailed prompt that covers all necessary aspects of the application.";

const HTML_GAMES_FOCUS: &str = "Focus on HTML5 Canvas, JavaScript game mechanics, sprite management, collision detection, game loop implementation, and responsive design considerations. Include requirements for assets, animations, and sound effects.";

const REACT_VITE_GAMES_FOCUS: &str = "Focus on React component architecture, state management, game logic implementation using hooks, asset management with Vite, and performance optimization. Include considerations for build process and deployment.";

const THREE_JS_FOCUS: &str = "Focus on Three.js scene setup, camera positioning, lighting, material properties, geometry creation, animation system, and user interactions. Include requirements for 3D models, textures, and performance optimization.";

const PYTHON_UTILITIES_FOCUS: &str = "Focus on command-line interface design, input validation, error handling, file operations, and potential integration with external services or APIs. Include requirements for dependencies, configuration, and documentation.";

const CONCISE_CLAUSE: &str = "Response style: no meta-commentary, output only the prompt text.";
const STANDARD_CLAUSE: &str =
    "Response style: brief context allowed before or after the prompt text.";
const DETAILED_CLAUSE: &str =
    "Response style: full explanations required for every section of the prompt.";

/// Kind of application the user is describing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AppCategory {
    HtmlGames,
    ReactViteGames,
    #[serde(rename = "threejs-visualizations")]
    ThreeJsVisualizations,
    PythonUtilities,
}

impl AppCategory {
    pub const ALL: [AppCategory; 4] = [
        AppCategory::HtmlGames,
        AppCategory::ReactViteGames,
        AppCategory::ThreeJsVisualizations,
        AppCategory::PythonUtilities,
    ];

    /// Human-readable label shown in forms and history
    pub fn label(&self) -> &'static str {
        match self {
            AppCategory::HtmlGames => "HTML Games",
            AppCategory::ReactViteGames => "React Vite Games",
            AppCategory::ThreeJsVisualizations => "HTML Three.js Visualizations",
            AppCategory::PythonUtilities => "Python Utilities",
        }
    }

    /// Stable identifier used in configuration files and on the command line
    pub fn slug(&self) -> &'static str {
        match self {
            AppCategory::HtmlGames => "html-games",
            AppCategory::ReactViteGames => "react-vite-games",
            AppCategory::ThreeJsVisualizations => "threejs-visualizations",
            AppCategory::PythonUtilities => "python-utilities",
        }
    }

    pub fn focus_clause(&self) -> &'static str {
        match self {
            AppCategory::HtmlGames => HTML_GAMES_FOCUS,
            AppCategory::ReactViteGames => REACT_VITE_GAMES_FOCUS,
            AppCategory::ThreeJsVisualizations => THREE_JS_FOCUS,
            AppCategory::PythonUtilities => PYTHON_UTILITIES_FOCUS,
        }
    }
}

impl fmt::Display for AppCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for AppCategory {
    type Err = LabelParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        AppCategory::ALL
            .into_iter()
            .find(|category| {
                category.slug().eq_ignore_ascii_case(needle)
                    || category.label().eq_ignore_ascii_case(needle)
            })
            .ok_or_else(|| LabelParseError::UnknownCategory(s.to_string()))
    }
}

/// How much commentary the provider may wrap around the generated prompt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Verbosity {
    Concise,
    #[default]
    Standard,
    Detailed,
}

impl Verbosity {
    pub const ALL: [Verbosity; 3] = [Verbosity::Concise, Verbosity::Standard, Verbosity::Detailed];

    pub fn label(&self) -> &'static str {
        match self {
            Verbosity::Concise => "Concise",
            Verbosity::Standard => "Standard",
            Verbosity::Detailed => "Detailed",
        }
    }

    pub fn slug(&self) -> &'static str {
        match self {
            Verbosity::Concise => "concise",
            Verbosity::Standard => "standard",
            Verbosity::Detailed => "detailed",
        }
    }

    pub fn clause(&self) -> &'static str {
        match self {
            Verbosity::Concise => CONCISE_CLAUSE,
            Verbosity::Standard => STANDARD_CLAUSE,
            Verbosity::Detailed => DETAILED_CLAUSE,
        }
    }
}

impl fmt::Display for Verbosity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Verbosity {
    type Err = LabelParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "concise" => Ok(Verbosity::Concise),
            "standard" => Ok(Verbosity::Standard),
            "detailed" => Ok(Verbosity::Detailed),
            _ => Err(LabelParseError::UnknownVerbosity(s.to_string())),
        }
    }
}

/// Error type for category and verbosity parsing failures
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LabelParseError {
    #[error("Unknown application category: '{0}'")]
    UnknownCategory(String),
    #[error("Unknown verbosity level: '{0}'. Expected concise, standard or detailed")]
    UnknownVerbosity(String),
}

/// Builds the provider-agnostic system instruction
pub struct PromptTemplateBuilder;

impl PromptTemplateBuilder {
    pub fn build(category: AppCategory, verbosity: Verbosity) -> String {
        Self::assemble(Some(category.focus_clause()), verbosity)
    }

    /// Resolve a free-form category label. Unknown labels only get the base
    /// statement and the verbosity clause.
    pub fn build_for_label(label: &str, verbosity: Verbosity) -> String {
        let focus = label.parse::<AppCategory>().ok().map(|c| c.focus_clause());
        Self::assemble(focus, verbosity)
    }

    pub fn base_statement() -> &'static str {
        BASE_PROMPT
    }

    fn assemble(focus: Option<&str>, verbosity: Verbosity) -> String {
        let mut instruction = String::from(BASE_PROMPT);
        if let Some(focus) = focus {
            instruction.push_str("\n\n");
            instruction.push_str(focus);
        }
        instruction.push_str("\n\n");
        instruction.push_str(verbosity.clause());
        instruction
    }
}
