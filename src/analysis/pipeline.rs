//! Branching analysis pipeline.
//!
//! A pipeline is an ordered list of [`Stage`]s. A stage may turn one token into
//! several (a tokenizer splitting text, the suggest filter expanding
//! prefixes), and each of those tokens is carried through the remaining stages
//! on its own branch. The run is complete only once every branch has either
//! reached the end of the pipeline or been dropped by a stage.
//!
//! # Examples
//!
//! ```
//! use std::sync::Arc;
//!
//! use bitsearch::analysis::pipeline::Pipeline;
//! use bitsearch::analysis::token_filter::{LowercaseFilter, StopFilter};
//! use bitsearch::analysis::tokenizer::AlphabetTokenizer;
//!
//! let pipeline = Pipeline::new("text")
//!     .add_stage(Arc::new(AlphabetTokenizer::new()))
//!     .add_stage(Arc::new(LowercaseFilter::new()))
//!     .add_stage(Arc::new(StopFilter::new()));
//!
//! let tokens = pipeline.analyze("The Lightning Thief").unwrap();
//! let texts: Vec<_> = tokens.iter().map(|t| t.text.as_str()).collect();
//! assert_eq!(texts, vec!["lightning", "thief"]);
//! ```

use std::fmt;
use std::sync::Arc;

use log::trace;

use crate::analysis::stage::Stage;
use crate::analysis::token::Token;
use crate::error::{BitsearchError, Result};

/// An ordered chain of stages with fan-out execution.
#[derive(Clone)]
pub struct Pipeline {
    name: String,
    stages: Vec<Arc<dyn Stage>>,
}

impl Pipeline {
    /// Create an empty pipeline. An empty pipeline is the unresolved (AUTO)
    /// placeholder and refuses to run.
    pub fn new<S: Into<String>>(name: S) -> Self {
        Pipeline {
            name: name.into(),
            stages: Vec::new(),
        }
    }

    /// Append a stage to the pipeline.
    pub fn add_stage(mut self, stage: Arc<dyn Stage>) -> Self {
        self.stages.push(stage);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn stages(&self) -> &[Arc<dyn Stage>] {
        &self.stages
    }

    /// Whether this is the unresolved placeholder pipeline.
    pub fn is_unresolved(&self) -> bool {
        self.stages.is_empty()
    }

    /// Run `token` through every stage, calling `emit` for each token that
    /// survives to the end. Output order follows input order depth first.
    ///
    /// Returns the number of emitted tokens once every branch has finished.
    pub fn run<F>(&self, token: Token, mut emit: F) -> Result<usize>
    where
        F: FnMut(Token),
    {
        if self.is_unresolved() {
            return Err(BitsearchError::analysis(format!(
                "Pipeline '{}' has no stages; resolve the field type before analysis",
                self.name
            )));
        }

        let depth_end = self.stages.len();
        let mut branches: Vec<(usize, Token)> = vec![(0, token)];
        let mut pending = 1usize;
        let mut emitted = 0usize;

        while pending > 0 {
            let Some((depth, token)) = branches.pop() else {
                break;
            };
            if depth == depth_end {
                emit(token);
                emitted += 1;
                pending -= 1;
                continue;
            }

            let produced: Vec<Token> = self.stages[depth].process(token)?.collect();
            trace!(
                "stage '{}' of '{}' produced {} token(s)",
                self.stages[depth].name(),
                self.name,
                produced.len()
            );
            // this branch ends here and forks into `produced.len()` new ones
            pending = pending - 1 + produced.len();
            branches.extend(produced.into_iter().rev().map(|t| (depth + 1, t)));
        }
        debug_assert!(branches.is_empty());

        Ok(emitted)
    }

    /// Analyze a whole text, returning every emitted token in order.
    pub fn analyze(&self, text: &str) -> Result<Vec<Token>> {
        let mut tokens = Vec::new();
        self.run(Token::new(text, 0), |token| tokens.push(token))?;
        Ok(tokens)
    }
}

impl fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let stages: Vec<&str> = self.stages.iter().map(|s| s.name()).collect();
        f.debug_struct("Pipeline")
            .field("name", &self.name)
            .field("stages", &stages)
            .finish()
    }
}
