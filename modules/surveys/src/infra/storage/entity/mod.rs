pub mod contributor_request;
pub mod question;
pub mod survey;
pub mod survey_contributor;
pub mod tenant;
pub mod user;
