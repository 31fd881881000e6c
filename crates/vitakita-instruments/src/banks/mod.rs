pub mod wellbeing_screen;
