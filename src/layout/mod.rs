//! # Page-Aware Layout
//!
//! Every placement decision is made against the page that is currently
//! open. Content is never laid out on an endless strip and sliced afterwards:
//! when a node does not fit, it is split or handed back to the executor and
//! the page is closed.
//!
//! ```text
//! Paginator
//!   └─ PageLayoutManager (one page at a time)
//!        ├─ create_root / update_body_size   page, header, body, footer geometry
//!        ├─ region layout                    header and footer, never break
//!        ├─ body layout                      stacking + break decisions
//!        ├─ fit-to-page                      optional, whole-page scale
//!        └─ emit, then total-page resolution on the last page
//! ```

pub mod fit;
pub mod page;
pub mod page_break;
pub mod paginate;
pub(crate) mod region;
pub(crate) mod stacking;
pub(crate) mod total_page;

pub use page::{create_root, update_body_size, Collaborators, PageLayoutManager, PageState};
pub use paginate::{PaginationSummary, Paginator};
