mod controls;
mod help;
mod hud;
mod settings;
