use clap::Args;
use serde_json::Value;

use finlit_core::coach::{coach_reply, ChatTurn, CoachInput, Role};

use crate::input;

/// Arguments for the scripted study coach
#[derive(Args)]
pub struct CoachArgs {
    /// Path to a JSON/YAML file with a full conversation history
    #[arg(long)]
    pub input: Option<String>,

    /// Single learner message to respond to
    #[arg(long)]
    pub message: Option<String>,
}

pub fn run_coach(args: CoachArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let conversation: CoachInput = if let Some(ref path) = args.input {
        input::file::read_input(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        let message = args
            .message
            .ok_or("--message is required (or provide --input)")?;
        CoachInput {
            history: vec![ChatTurn {
                role: Role::Learner,
                content: message,
            }],
            script: None,
        }
    };

    Ok(serde_json::to_value(coach_reply(&conversation)?)?)
}
