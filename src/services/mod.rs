pub mod boundary_parser;
pub mod form_filler;
pub mod result_scraper;

pub use boundary_parser::{calculate_confidence, extract_boundaries};
pub use form_filler::{fill_search_form, FieldFillOutcome};
pub use result_scraper::{find_document_link, scrape_entries, wait_for_results};
