mod app;
mod input;
mod navigation;
mod preferences;
mod ui;

fn main() -> eframe::Result {
    // Optional first argument: a session link such as `?x=-0.5&y=0&z=1`.
    app::run(std::env::args().nth(1))
}
