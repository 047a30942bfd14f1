mod common;
mod misdemeanor;
