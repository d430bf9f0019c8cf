use image::{Rgb, RgbImage};

/// Writes a 400x400 screenshot-like image with an empty 360x360 board,
/// handy for trying the CLI without a real game capture.
fn main() -> anyhow::Result<()> {
    let mut img = RgbImage::from_pixel(400, 400, Rgb([250, 248, 239]));

    for y in 20..380 {
        for x in 20..380 {
            // Grid lines every 90px, cells in between
            let on_line = (x - 20) % 90 < 6 || (y - 20) % 90 < 6;
            let color = if on_line { Rgb([187, 173, 160]) } else { Rgb([205, 193, 180]) };
            img.put_pixel(x, y, color);
        }
    }

    img.save("test_board.png")?;
    println!("Created test_board.png (400x400, empty 4x4 board)");
    Ok(())
}
