pub mod food_form;
