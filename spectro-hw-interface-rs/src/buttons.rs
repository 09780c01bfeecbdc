//! Front-panel push buttons.

use embassy_rp::gpio::Input;
use spectro::io::Button;

/// Active-low button with the internal pull-up enabled.
pub struct PanelButton(Input<'static>);

impl PanelButton {
    pub fn new(input: Input<'static>) -> Self {
        Self(input)
    }
}

impl Button for PanelButton {
    fn is_pressed(&mut self) -> bool {
        self.0.is_low()
    }
}
