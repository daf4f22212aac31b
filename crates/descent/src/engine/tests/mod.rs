
mod recursion_tests;
