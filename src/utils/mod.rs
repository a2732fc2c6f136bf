// Utility modules for common functionality
pub mod pages;
