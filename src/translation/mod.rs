/*!
 * Copy/paste translation round trip.
 *
 * - `prompts`: builds the numbered request text handed to a translator
 * - `merge`: folds the translator's numbered reply back into the blocks
 */

pub mod merge;
pub mod prompts;

pub use merge::{merge_response, MergeReport};
pub use prompts::{build_request, PromptTemplate};
