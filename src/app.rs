use eframe::egui;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, Sender};

use negative_develop::color::sampler;
use negative_develop::generation::{RenderGeneration, RenderTicket};
use negative_develop::image_io;
use negative_develop::params::FilmStock;
use negative_develop::resolution::{self, Rendered};
use negative_develop::{NegativeParams, ParamsUpdate, RenderTarget, ResolutionManager};

type PreviewResult = (RenderTicket, negative_develop::Result<Rendered>);
type ExportResult = negative_develop::Result<(PathBuf, f64)>;

pub struct NegativeApp {
    manager: ResolutionManager,
    params: NegativeParams,
    source_path: Option<PathBuf>,
    preview_texture: Option<egui::TextureHandle>,
    preview_width: usize,
    preview_height: usize,
    needs_render: bool,
    render_time_ms: f64,
    eyedropper: bool,
    sample_radius: u32,
    generation: Arc<RenderGeneration>,
    preview_tx: Sender<PreviewResult>,
    preview_rx: Receiver<PreviewResult>,
    pending_previews: usize,
    export_rx: Option<Receiver<ExportResult>>,
    status: String,
}

impl NegativeApp {
    pub fn new(_cc: &eframe::CreationContext<'_>) -> Self {
        let (preview_tx, preview_rx) = mpsc::channel();
        Self {
            manager: ResolutionManager::new(),
            params: NegativeParams::default(),
            source_path: None,
            preview_texture: None,
            preview_width: 0,
            preview_height: 0,
            needs_render: false,
            render_time_ms: 0.0,
            eyedropper: false,
            sample_radius: sampler::DEFAULT_SAMPLE_RADIUS,
            generation: Arc::new(RenderGeneration::new()),
            preview_tx,
            preview_rx,
            pending_previews: 0,
            export_rx: None,
            status: String::new(),
        }
    }

    fn open_image(&mut self) {
        let Some(path) = rfd::FileDialog::new()
            .add_filter("Images", &["png", "jpg", "jpeg", "tiff", "tif", "bmp", "webp"])
            .pick_file()
        else {
            return;
        };

        let loaded = image_io::load_image(&path)
            .and_then(|img| image_io::to_pixel_buffer(&img))
            .and_then(|buf| self.manager.load(buf));
        match loaded {
            Ok(()) => {
                self.source_path = Some(path);
                self.preview_texture = None;
                self.needs_render = true;
                self.status.clear();
            }
            Err(e) => {
                log::error!("failed to load {}: {e}", path.display());
                self.status = format!("Load failed: {e}");
            }
        }
    }

    fn start_export(&mut self) {
        if self.export_rx.is_some() {
            return;
        }
        let full = match self.manager.full_original() {
            Ok(full) => full,
            Err(e) => {
                log::warn!("export requested: {e}");
                self.status = format!("Export failed: {e}");
                return;
            }
        };
        let Some(path) = rfd::FileDialog::new()
            .add_filter("PNG", &["png"])
            .add_filter("JPEG", &["jpg", "jpeg"])
            .add_filter("TIFF", &["tiff", "tif"])
            .save_file()
        else {
            return;
        };

        let params = self.params;
        let (tx, rx) = mpsc::channel();
        self.export_rx = Some(rx);
        self.status = "Exporting...".to_string();
        rayon::spawn(move || {
            let result = resolution::render_original(&full, RenderTarget::Export, &params)
                .and_then(|rendered| {
                    image_io::save_image(&rendered.buffer, &path)?;
                    Ok((path, rendered.elapsed_ms))
                });
            let _ = tx.send(result);
        });
    }

    /// Kick off a preview render of the current snapshot on the rayon pool.
    fn request_preview(&mut self) {
        let preview = match self.manager.preview_original() {
            Ok(preview) => preview,
            Err(_) => return,
        };
        let ticket = self.generation.issue();
        let params = self.params;
        let tx = self.preview_tx.clone();
        self.pending_previews += 1;
        rayon::spawn(move || {
            let result = resolution::render_original(&preview, RenderTarget::Preview, &params);
            let _ = tx.send((ticket, result));
        });
    }

    fn poll_workers(&mut self, ctx: &egui::Context) {
        while let Ok((ticket, result)) = self.preview_rx.try_recv() {
            self.pending_previews = self.pending_previews.saturating_sub(1);
            if !self.generation.is_current(ticket) {
                continue;
            }
            match result {
                Ok(rendered) => self.show_preview(ctx, rendered),
                Err(e) => {
                    log::error!("preview render failed: {e}");
                    self.status = format!("Preview failed: {e}");
                }
            }
        }

        let finished = self.export_rx.as_ref().and_then(|rx| rx.try_recv().ok());
        if let Some(result) = finished {
            self.export_rx = None;
            self.status = match result {
                Ok((path, ms)) => format!("Exported {} ({ms:.0}ms)", path.display()),
                Err(e) => {
                    log::error!("export failed: {e}");
                    format!("Export failed: {e}")
                }
            };
        }

        if self.pending_previews > 0 || self.export_rx.is_some() {
            ctx.request_repaint();
        }
    }

    fn show_preview(&mut self, ctx: &egui::Context, rendered: Rendered) {
        let (w, h) = rendered.buffer.dimensions();
        self.preview_width = w as usize;
        self.preview_height = h as usize;
        self.render_time_ms = rendered.elapsed_ms;
        let color_image = egui::ColorImage::from_rgba_unmultiplied(
            [self.preview_width, self.preview_height],
            rendered.buffer.as_bytes(),
        );
        self.preview_texture = Some(ctx.load_texture(
            "preview",
            color_image,
            egui::TextureOptions::LINEAR,
        ));
    }

    fn apply_update(&mut self, update: ParamsUpdate) {
        match update.apply(&self.params) {
            Ok(next) => {
                self.params = next;
                self.needs_render = true;
            }
            Err(e) => log::warn!("rejected parameter update: {e}"),
        }
    }

    fn sample_at(&mut self, pos: egui::Vec2, display: egui::Vec2) {
        let Some((x, y)) = sampler::display_to_buffer(
            (pos.x, pos.y),
            (display.x, display.y),
            (self.preview_width as u32, self.preview_height as u32),
        ) else {
            return;
        };
        match self.manager.sample_base_area(x, y, self.sample_radius) {
            Ok(base) => {
                log::info!("sampled base colour {:?} at ({x}, {y})", base.to_array());
                self.apply_update(ParamsUpdate {
                    base_color: Some(base),
                    ..Default::default()
                });
                self.eyedropper = false;
            }
            Err(e) => log::debug!("ignored sample: {e}"),
        }
    }
}

impl eframe::App for NegativeApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll_workers(ctx);

        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                if ui.button("Open Image").clicked() {
                    self.open_image();
                }
                let can_export = self.manager.is_loaded() && self.export_rx.is_none();
                if ui.add_enabled(can_export, egui::Button::new("Export")).clicked() {
                    self.start_export();
                }
                ui.separator();

                ui.label("Film:");
                // edited or sampled bases that match no preset show as custom
                let current = FilmStock::matching(self.params.base_color);
                egui::ComboBox::from_id_salt("film_stock")
                    .selected_text(current.map_or("Custom", FilmStock::name))
                    .show_ui(ui, |ui| {
                        for &stock in FilmStock::ALL {
                            if ui
                                .selectable_label(current == Some(stock), stock.name())
                                .clicked()
                            {
                                self.apply_update(ParamsUpdate {
                                    base_color: Some(stock.base_color()),
                                    ..Default::default()
                                });
                            }
                        }
                    });

                ui.toggle_value(&mut self.eyedropper, "Pick Base");

                if ui.button("Reset").clicked() {
                    self.params = NegativeParams::default();
                    self.needs_render = true;
                }

                ui.separator();
                if self.source_path.is_some() {
                    ui.label(format!(
                        "{}x{} | {:.0}ms",
                        self.preview_width, self.preview_height, self.render_time_ms
                    ));
                }
                if !self.status.is_empty() {
                    ui.separator();
                    ui.label(self.status.as_str());
                }
            });
        });

        egui::SidePanel::left("controls")
            .default_width(300.0)
            .resizable(true)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    let mut draft = self.params;
                    let mut changed = false;
                    changed |= ui_base(ui, &mut draft, &mut self.sample_radius);
                    changed |= ui_tone(ui, &mut draft);
                    changed |= ui_global(ui, &mut draft);

                    if changed {
                        match draft.validate() {
                            Ok(()) => {
                                self.params = draft;
                                self.needs_render = true;
                            }
                            Err(e) => log::warn!("rejected parameter edit: {e}"),
                        }
                    }
                });
            });

        if self.needs_render && self.manager.is_loaded() {
            self.request_preview();
            self.needs_render = false;
        }

        egui::CentralPanel::default().show(ctx, |ui| {
            let Some(tex) = &self.preview_texture else {
                ui.centered_and_justified(|ui| {
                    ui.label("Open a negative to begin");
                });
                return;
            };

            let available = ui.available_size();
            let img_w = self.preview_width as f32;
            let img_h = self.preview_height as f32;
            let scale = f32::min(available.x / img_w, available.y / img_h).min(1.0);
            let display_size = egui::vec2(img_w * scale, img_h * scale);
            let response = ui.add(
                egui::Image::new(egui::load::SizedTexture::new(tex.id(), display_size))
                    .sense(egui::Sense::click()),
            );

            if self.eyedropper
                && response.clicked()
                && let Some(pos) = response.interact_pointer_pos()
            {
                let rel = pos - response.rect.min;
                self.sample_at(rel, response.rect.size());
            }
        });
    }
}

// --- UI Section Builders ---

fn ui_base(ui: &mut egui::Ui, params: &mut NegativeParams, sample_radius: &mut u32) -> bool {
    let mut changed = false;
    egui::CollapsingHeader::new("Film Base")
        .default_open(true)
        .show(ui, |ui| {
            let base = params.base_color;
            let (rect, _) = ui.allocate_exact_size(egui::vec2(48.0, 16.0), egui::Sense::hover());
            ui.painter()
                .rect_filled(rect, 2.0, egui::Color32::from_rgb(base.r, base.g, base.b));

            changed |= ui
                .add(egui::Slider::new(&mut params.base_color.r, 0..=255).text("R"))
                .changed();
            changed |= ui
                .add(egui::Slider::new(&mut params.base_color.g, 0..=255).text("G"))
                .changed();
            changed |= ui
                .add(egui::Slider::new(&mut params.base_color.b, 0..=255).text("B"))
                .changed();
            ui.add(egui::Slider::new(sample_radius, 0..=10).text("Sample Radius"));

            changed |= ui
                .add(
                    egui::Slider::new(&mut params.exposure, 0.1..=3.0)
                        .logarithmic(true)
                        .text("Exposure"),
                )
                .changed();
        });
    changed
}

fn ui_tone(ui: &mut egui::Ui, params: &mut NegativeParams) -> bool {
    let mut changed = false;
    egui::CollapsingHeader::new("Split Tone")
        .default_open(true)
        .show(ui, |ui| {
            changed |= ui_triple(ui, "Shadows", &mut params.tone.shadows);
            ui.separator();
            changed |= ui_triple(ui, "Midtones", &mut params.tone.midtones);
            ui.separator();
            changed |= ui_triple(ui, "Highlights", &mut params.tone.highlights);
        });
    changed
}

fn ui_triple(ui: &mut egui::Ui, label: &str, values: &mut [f64; 3]) -> bool {
    let mut changed = false;
    ui.label(label);
    for (value, name) in values.iter_mut().zip(["R", "G", "B"]) {
        changed |= ui
            .add(egui::Slider::new(value, -100.0..=100.0).text(name))
            .changed();
    }
    changed
}

fn ui_global(ui: &mut egui::Ui, params: &mut NegativeParams) -> bool {
    let mut changed = false;
    egui::CollapsingHeader::new("Brightness / Contrast")
        .default_open(true)
        .show(ui, |ui| {
            changed |= ui
                .add(egui::Slider::new(&mut params.global.brightness, 0.1..=3.0).text("Brightness"))
                .changed();
            changed |= ui
                .add(egui::Slider::new(&mut params.global.contrast, 0.0..=3.0).text("Contrast"))
                .changed();
        });
    changed
}
