#[cfg(test)]
#[path = "slider_test.rs"]
mod tests;

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ContainerBounds {
    pub left: f64,
    pub width: f64,
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum PointerInput {
    MouseDown(f64),
    MouseMove(f64),
    MouseUp,
    MouseLeave,
    TouchStart(f64),
    TouchMove(f64),
    TouchEnd,
}

/// Percentage of the container to the left of `x`, clamped to `[0, 100]`.
/// Returns `None` when the container has no measurable width.
pub fn slider_percentage(x: f64, bounds: ContainerBounds) -> Option<f64> {
    if bounds.width <= 0.0 || !bounds.width.is_finite() || x.is_nan() {
        return None;
    }

    let percentage = ((x - bounds.left) / bounds.width) * 100.0;
    return Some(percentage.clamp(0.0, 100.0));
}

#[derive(Clone, Debug)]
pub struct Slider {
    position: f64,
    dragging: bool,
    container: Option<ContainerBounds>,
    container_width: Option<f64>,
}

impl Default for Slider {
    fn default() -> Slider {
        return Slider::new(50.0);
    }
}

impl Slider {
    pub fn new(initial_position: f64) -> Slider {
        return Slider {
            position: initial_position.clamp(0.0, 100.0),
            dragging: false,
            container: None,
            container_width: None,
        };
    }

    pub fn position(&self) -> f64 {
        return self.position;
    }

    pub fn is_dragging(&self) -> bool {
        return self.dragging;
    }

    pub fn container_width(&self) -> Option<f64> {
        return self.container_width;
    }

    pub fn mount(&mut self, bounds: ContainerBounds) {
        self.container = Some(bounds);
        self.container_width = Some(bounds.width);
    }

    pub fn unmount(&mut self) {
        self.container = None;
        self.dragging = false;
    }

    pub fn resize(&mut self, bounds: ContainerBounds) {
        if self.container.is_none() {
            return;
        }

        self.mount(bounds);
    }

    pub fn handle(&mut self, input: PointerInput) {
        match input {
            PointerInput::MouseDown(x) | PointerInput::TouchStart(x) => {
                self.dragging = true;
                self.calculate(x);
            }
            PointerInput::MouseMove(x) | PointerInput::TouchMove(x) => {
                if !self.dragging {
                    return;
                }
                self.calculate(x);
            }
            PointerInput::MouseUp | PointerInput::MouseLeave | PointerInput::TouchEnd => {
                self.dragging = false;
            }
        }
    }

    fn calculate(&mut self, x: f64) {
        let bounds = match self.container {
            Some(bounds) => bounds,
            None => return,
        };

        if let Some(percentage) = slider_percentage(x, bounds) {
            self.position = percentage;
        }
    }
}
