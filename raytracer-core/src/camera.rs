use crate::image::{v3_to_rgba, Image};
use crate::scene::Scene;
use crate::types::{Ray, V3};

/// The camera's default position, used when a scene file doesn't
/// override it.
pub const DEFAULT_POSITION: V3 = V3(0.0, 0.0, -1.0);

/// A fixed-orientation pinhole camera: always looks down `+z`, from
/// `position` towards the image plane at `z = 0`. Only the origin is
/// configurable — there is no look-at target or field of view, matching
/// the reference renderer's camera model.
pub struct Camera {
    position: V3,
    plane_width: f32,
    plane_height: f32,
    image_width: u32,
    image_height: u32,
}

impl Camera {
    /// `image_width` and `image_height` fix the image plane's aspect
    /// ratio: the plane is always `1.0` wide, `1.0 / aspect_ratio` tall.
    pub fn new(position: V3, image_width: u32, image_height: u32) -> Camera {
        let aspect_ratio = image_width as f32 / image_height as f32;
        Camera {
            position,
            plane_width: 1.0,
            plane_height: 1.0 / aspect_ratio,
            image_width,
            image_height,
        }
    }

    pub fn image_width(&self) -> u32 {
        self.image_width
    }

    pub fn image_height(&self) -> u32 {
        self.image_height
    }

    /// Builds the primary ray through the center of pixel `(x, y)`.
    pub fn ray_for_pixel(&self, x: u32, y: u32) -> Ray {
        let x_coord =
            -0.5 + (x as f32 + 0.5) * (self.plane_width / self.image_width as f32);
        let y_coord = (self.plane_height / 2.0)
            - (y as f32 + 0.5) * (self.plane_height / self.image_height as f32);
        let target = V3(x_coord, y_coord, 0.0);
        Ray::new(self.position, target - self.position)
    }
}

impl Default for Camera {
    fn default() -> Self {
        Camera::new(DEFAULT_POSITION, 1, 1)
    }
}

/// Renders `scene` through `camera` into an image sized to
/// `camera.image_width() x camera.image_height()`, splitting the work
/// into disjoint row bands across `std::thread::available_parallelism`
/// worker threads (falling back to 4 if unavailable, or to
/// `thread_count_override` when given).
pub fn render(scene: &Scene, camera: &Camera, thread_count_override: Option<u32>) -> Image {
    let width = camera.image_width();
    let height = camera.image_height();
    let mut image = Image::new(width, height);

    if width == 0 || height == 0 {
        return image;
    }

    let thread_count = thread_count_override.unwrap_or_else(|| {
        std::thread::available_parallelism()
            .map(|n| n.get() as u32)
            .unwrap_or(4)
    });
    let band_count = thread_count.max(1).min(height);

    let rows_per_band = height / band_count;
    let extra_rows = height % band_count;

    std::thread::scope(|scope| {
        let mut remaining: Vec<&mut [u8]> = image.rows_mut().collect();
        let mut next_row = 0u32;

        for band in 0..band_count {
            let band_rows = rows_per_band + if band < extra_rows { 1 } else { 0 };
            if band_rows == 0 {
                continue;
            }
            let (this_band, rest) = remaining.split_at_mut(band_rows as usize);
            remaining = rest;
            let start_row = next_row;
            next_row += band_rows;

            scope.spawn(move || {
                for (i, row) in this_band.iter_mut().enumerate() {
                    let y = start_row + i as u32;
                    for x in 0..width {
                        let ray = camera.ray_for_pixel(x, y);
                        let color = scene.raycast(&ray, &ray, 0);
                        let rgba = v3_to_rgba(color);
                        let offset = x as usize * 4;
                        row[offset..offset + 4].copy_from_slice(&rgba);
                    }
                }
            });
        }
    });

    image
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn center_pixel_ray_points_straight_down_z() {
        let camera = Camera::new(DEFAULT_POSITION, 100, 100);
        let ray = camera.ray_for_pixel(50, 50);
        assert!(ray.direction.x().abs() < 1e-3);
        assert!(ray.direction.y().abs() < 1e-3);
        assert!(ray.direction.z() > 0.0);
    }

    #[test]
    fn wider_image_has_a_wider_image_plane() {
        let camera = Camera::new(DEFAULT_POSITION, 200, 100);
        // Left-edge pixel should map to a more negative x than a square image's.
        let wide_left = camera.ray_for_pixel(0, 50);
        let square = Camera::new(DEFAULT_POSITION, 100, 100);
        let square_left = square.ray_for_pixel(0, 50);
        assert!(wide_left.direction.x() < square_left.direction.x());
    }

    #[test]
    fn render_produces_an_image_of_the_camera_dimensions() {
        let scene = Scene::new();
        let camera = Camera::new(DEFAULT_POSITION, 8, 6);
        let image = render(&scene, &camera, Some(2));
        assert_eq!(image.width(), 8);
        assert_eq!(image.height(), 6);
        assert_eq!(image.as_raw().len(), 8 * 6 * 4);
    }

    #[test]
    fn render_of_empty_scene_is_entirely_black() {
        let scene = Scene::new();
        let camera = Camera::new(DEFAULT_POSITION, 4, 4);
        let image = render(&scene, &camera, Some(1));
        assert!(image.as_raw().chunks(4).all(|p| p == [0, 0, 0, 255]));
    }
}
