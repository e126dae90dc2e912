pub mod align_helper;
