//! Demo drawing program (native).

#[cfg(feature = "native")]
fn main() {
    use penpaper_app::{run, AppConfig};
    use penpaper_core::{Key, PaperConfig, PaperResult, Pen, Rgba};
    use std::sync::{Arc, Mutex};

    fn draw(host: penpaper_app::Host) -> PaperResult<()> {
        let paper = host.open_paper(PaperConfig::default().with_title("Penpaper demo"))?;
        let mut pen = Pen::new(&paper)?;

        pen.move_to(427.0, 240.0)?;
        pen.set_heading(0.0);
        pen.down();
        pen.set_color(Rgba::rgb(59, 130, 246));
        for step in 0..60 {
            pen.move_by(f64::from(step) * 2.5)?;
            pen.turn_by(91.0);
        }

        pen.up();
        pen.move_to(60.0, 60.0)?;
        pen.set_heading(0.0);
        pen.down();
        pen.set_color(Rgba::RED);
        pen.set_stroke_width(3);
        pen.draw_circle(30.0)?;
        pen.draw_rect(120.0, 60.0)?;

        pen.up();
        pen.move_to(40.0, 450.0)?;
        pen.set_heading(0.0);
        pen.down();
        pen.set_color(Rgba::BLACK);
        pen.write("Space: draw a polygon, C: clear")?;

        let pen = Arc::new(Mutex::new(pen));
        let polygon_pen = pen.clone();
        let polygon_paper = paper.clone();
        paper.add_key_binding(Key::Space, move || {
            let sides = match polygon_paper.request_integer() {
                Ok(sides) => sides.clamp(3, 36),
                Err(e) => {
                    log::warn!("No polygon: {e}");
                    return;
                }
            };
            let mut pen = polygon_pen.lock().unwrap_or_else(|e| e.into_inner());
            let (x, y) = match (polygon_paper.mouse_x(), polygon_paper.mouse_y()) {
                (Some(x), Some(y)) => (x, y),
                _ => (427.0, 240.0),
            };
            let result = (|| {
                pen.up();
                pen.move_to(x, y)?;
                pen.set_heading(0.0);
                pen.down();
                for _ in 0..sides {
                    pen.move_by(40.0)?;
                    pen.turn_by(360.0 / f64::from(sides));
                }
                Ok::<_, penpaper_core::PaperError>(())
            })();
            if let Err(e) = result {
                log::warn!("Polygon interrupted: {e}");
            }
        })?;

        let clear_paper = paper.clone();
        paper.add_key_binding(Key::Char('c'), move || {
            if let Err(e) = clear_paper.clear() {
                log::warn!("Clear failed: {e}");
            }
        })?;
        Ok(())
    }

    env_logger::init();
    log::info!("Starting penpaper demo");

    let result = run(AppConfig::default(), |host| {
        if let Err(e) = draw(host) {
            log::error!("Demo stopped: {e}");
        }
    });
    if let Err(e) = result {
        log::error!("{e}");
        std::process::exit(1);
    }
}

#[cfg(not(feature = "native"))]
fn main() {
    panic!("Native feature not enabled. Use `cargo run --features native`");
}
