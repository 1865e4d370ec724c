
mod property_match;
