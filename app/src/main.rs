use std::path::Path;
use std::time::Instant;

use eframe::{App, CreationContext, Frame, NativeOptions, egui, run_native};
use egui::{ColorImage, TextureHandle, Vec2};
use image::RgbImage;
use topo::bmp::write_bmp;
use topo::{ContourConfig, GridState, generate, random_seed, render_image};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

// Optional parameter overrides, read from the working directory
const CONFIG_FILE: &str = "contour.toml";

struct ContourApp {
    // parameters
    config: ContourConfig,
    seed: u64,

    // last generation; replaced wholesale on every redraw
    state: Option<GridState>,
    image: Option<RgbImage>,
    texture: Option<TextureHandle>,

    // status line
    status_message: String,
}

impl ContourApp {
    fn new(cc: &CreationContext<'_>) -> Self {
        let (config, config_message) = if Path::new(CONFIG_FILE).exists() {
            match ContourConfig::load(CONFIG_FILE) {
                Ok(config) => (config, format!("Loaded {}", CONFIG_FILE)),
                Err(e) => {
                    warn!(error = %e, "ignoring {}", CONFIG_FILE);
                    (ContourConfig::default(), format!("{}: {}", CONFIG_FILE, e))
                }
            }
        } else {
            (ContourConfig::default(), String::new())
        };

        let mut app = Self {
            config,
            seed: random_seed(),
            state: None,
            image: None,
            texture: None,
            status_message: String::new(),
        };
        app.regenerate(&cc.egui_ctx);
        if !config_message.is_empty() {
            app.status_message = format!("{}\n{}", config_message, app.status_message);
        }
        app
    }

    fn regenerate(&mut self, ctx: &egui::Context) {
        let start = Instant::now();
        let result = generate(&self.config, self.seed).and_then(|state| {
            let img = render_image(&state, &self.config)?;
            Ok((state, img))
        });

        match result {
            Ok((state, img)) => {
                let size = [img.width() as usize, img.height() as usize];
                let color_image = ColorImage::from_rgb(size, img.as_raw());
                self.texture =
                    Some(ctx.load_texture("contour", color_image, egui::TextureOptions::LINEAR));
                let ms = start.elapsed().as_secs_f32() * 1000.0;
                self.status_message = format!(
                    "Generated {}×{} grid in {:.2} ms (seed {})",
                    state.grid.cols(),
                    state.grid.rows(),
                    ms,
                    state.seed
                );
                info!(seed = state.seed, elapsed_ms = ms, "redrew contour map");
                self.state = Some(state);
                self.image = Some(img);
            }
            Err(e) => {
                warn!(error = %e, "generation failed");
                self.status_message = format!("Error: {}", e);
            }
        }
        ctx.request_repaint();
    }

    fn save(&mut self, extension: &str) {
        let Some(img) = &self.image else {
            self.status_message = "Nothing to save yet".into();
            return;
        };
        let seed = self.state.as_ref().map_or(self.seed, |s| s.seed);
        let Some(path) = rfd::FileDialog::new()
            .set_file_name(format!("contour_{}.{}", seed, extension))
            .add_filter(extension.to_uppercase(), &[extension])
            .save_file()
        else {
            return;
        };

        let result = match extension {
            "bmp" => write_bmp(&path, img),
            _ => img.save(&path).map_err(Into::into),
        };
        self.status_message = match result {
            Ok(()) => format!("Saved {}", path.display()),
            Err(e) => format!("Save failed: {}", e),
        };
    }

    fn controls(&mut self, ui: &mut egui::Ui, ctx: &egui::Context) {
        ui.heading("Contour Map");
        ui.separator();

        // Seed
        ui.label("Seed");
        ui.add(egui::DragValue::new(&mut self.seed).speed(1.0));

        ui.label("Grid stride (px)");
        ui.add(egui::Slider::new(&mut self.config.stride, 2..=16));

        ui.separator();
        ui.label("Octaves");
        ui.add(egui::Slider::new(&mut self.config.octaves, 1..=8));
        ui.label("Lacunarity");
        ui.add(egui::Slider::new(&mut self.config.lacunarity, 1.0..=4.0));
        ui.label("Persistence");
        ui.add(egui::Slider::new(&mut self.config.persistence, 0.05..=1.0));
        ui.label("Warp amount (px)");
        ui.add(egui::Slider::new(&mut self.config.warp_amount, 0.0..=200.0));

        ui.separator();
        ui.label("Levels");
        ui.add(egui::Slider::new(&mut self.config.num_levels, 1..=40));
        ui.label("Iso range");
        ui.add(egui::Slider::new(&mut self.config.iso_range.0, 0.0..=1.0).text("min"));
        ui.add(egui::Slider::new(&mut self.config.iso_range.1, 0.0..=1.0).text("max"));
        ui.label("Major line every");
        ui.add(egui::Slider::new(&mut self.config.major_every, 1..=10));

        ui.separator();

        if ui.button("Redraw").clicked() {
            self.seed = random_seed();
            self.regenerate(ctx);
        }
        if ui.button("Render this seed").clicked() {
            self.regenerate(ctx);
        }
        if ui.button("Reset parameters").clicked() {
            self.config = ContourConfig::default();
            self.regenerate(ctx);
        }

        ui.separator();
        if ui.button("Save BMP…").clicked() {
            self.save("bmp");
        }
        if ui.button("Save PNG…").clicked() {
            self.save("png");
        }

        ui.separator();
        ui.label(&self.status_message);
    }
}

impl App for ContourApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut Frame) {
        egui::SidePanel::left("controls").show(ctx, |ui| self.controls(ui, ctx));

        egui::CentralPanel::default().show(ctx, |ui| {
            if let Some(tex) = &self.texture {
                // Fit the page into the panel, keeping its aspect ratio
                let available = ui.available_size();
                let [w, h] = tex.size();
                let scale = (available.x / w as f32).min(available.y / h as f32);
                ui.centered_and_justified(|ui| {
                    ui.image((tex.id(), Vec2::new(w as f32 * scale, h as f32 * scale)));
                });
            } else {
                ui.centered_and_justified(|ui| {
                    ui.label("Click “Redraw” to start");
                });
            }
        });
    }
}

fn main() -> eframe::Result {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let opts = NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([820.0, 860.0])
            .with_min_inner_size([400.0, 300.0]),
        ..Default::default()
    };
    run_native(
        "Contour Map",
        opts,
        Box::new(|cc| Ok(Box::new(ContourApp::new(cc)))),
    )
}
