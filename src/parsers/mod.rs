pub mod entity_link_parser;
pub mod linktarget_parser;
pub mod page_parser;
pub mod pagelinks_parser;
pub mod redirect_parser;
pub mod sql_dump;

pub use entity_link_parser::*;
pub use linktarget_parser::*;
pub use page_parser::*;
pub use pagelinks_parser::*;
pub use redirect_parser::*;
