pub mod foods;
