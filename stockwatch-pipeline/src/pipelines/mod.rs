pub mod risk_review;
