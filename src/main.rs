mod app;

fn main() -> eframe::Result {
    env_logger::init();

    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 800.0])
            .with_min_inner_size([800.0, 600.0])
            .with_title("Negative Develop"),
        ..Default::default()
    };

    eframe::run_native(
        "Negative Develop",
        options,
        Box::new(|cc| Ok(Box::new(app::NegativeApp::new(cc)))),
    )
}
