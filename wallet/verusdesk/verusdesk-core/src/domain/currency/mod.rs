pub mod assembler;
pub mod draft;
pub mod options;

pub use assembler::assemble_definition;
pub use draft::{validate_draft, CurrencyDefinitionDraft, PreallocationEntry};
pub use options::{project, project_mask, CurrencyOption, GroupId, OptionSelection, ProjectedOptions};
