mod cadastral_tests;
mod report_tests;
mod valuation_tests;
