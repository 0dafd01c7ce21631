// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

// Built-in session content used when nothing was supplied.

use super::session::Mode;

pub const DEFAULT_PROMPT: &str = "what is 2 + 2";

pub const DEFAULT_JSON_SCHEMA: &str = r#"{
  "type": "object",
  "properties": {
    "steps": {
      "type": "array",
      "description": "A sequence of steps involved in the process.",
      "items": {
        "type": "object",
        "properties": {
          "description": {
            "type": "string",
            "description": "A description of the specific step."
          },
          "result": {
            "type": "string",
            "description": "The outcome of this specific step."
          }
        },
        "required": [
          "description",
          "result"
        ],
        "additionalProperties": false
      }
    },
    "final_result": {
      "type": "string",
      "description": "The final outcome or result of all the steps."
    }
  },
  "required": [
    "steps",
    "final_result"
  ],
  "additionalProperties": false
}"#;

pub const NORMAL_EXAMPLE_PROMPTS: &[&str] = &[
    "Explain how promises work in JavaScript",
    "What are the SOLID principles?",
    "Compare different state management solutions in React",
];

pub const STRUCTURED_EXAMPLE_PROMPTS: &[&str] = &[
    "Create a TypeScript interface for a blog post",
    "Design a REST API for a todo app",
    "Write a function to validate email addresses",
];

/// Example prompts offered for `mode`
pub fn example_prompts(mode: Mode) -> &'static [&'static str] {
    match mode {
        Mode::Normal => NORMAL_EXAMPLE_PROMPTS,
        Mode::Structured => STRUCTURED_EXAMPLE_PROMPTS,
    }
}

/// 1-based lookup into [`example_prompts`]
pub fn example_prompt(mode: Mode, number: usize) -> Option<&'static str> {
    number
        .checked_sub(1)
        .and_then(|index| example_prompts(mode).get(index))
        .copied()
}
