mod reader;

pub use reader::read_prompt_file;
