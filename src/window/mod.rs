use glfw::{
    fail_on_errors, Action, ClientApiHint, Glfw, GlfwReceiver, Key, PWindow, WindowEvent,
    WindowHint, WindowMode,
};
use tracing::{debug, trace};

use crate::{WindowError, WindowSettings};

pub struct WindowManager {
    glfw: Glfw,
    window: PWindow,
    receiver: GlfwReceiver<(f64, WindowEvent)>,
}

impl WindowManager {
    /// Opens a fixed size window without a client API, ready to get a Vulkan surface.
    pub fn try_new(settings: &WindowSettings) -> Result<Self, WindowError> {
        let mut glfw = glfw::init(fail_on_errors!())?;
        if !glfw.vulkan_supported() {
            return Err(WindowError::VulkanUnsupported);
        }

        glfw.window_hint(WindowHint::ClientApi(ClientApiHint::NoApi));
        glfw.window_hint(WindowHint::Resizable(false));
        let (mut window, events) = glfw
            .create_window(
                settings.width,
                settings.height,
                &settings.title,
                WindowMode::Windowed,
            )
            .ok_or(WindowError::Creation)?;
        window.set_key_polling(true);
        debug!(
            "Created {}x{} window \"{}\"",
            settings.width, settings.height, settings.title
        );

        Ok(Self {
            window,
            glfw,
            receiver: events,
        })
    }

    /// The instance extensions GLFW needs to create surfaces for its windows.
    pub fn required_instance_extensions(&self) -> Result<Vec<String>, WindowError> {
        self.glfw
            .get_required_instance_extensions()
            .ok_or(WindowError::VulkanUnsupported)
    }

    pub fn window(&self) -> &PWindow {
        &self.window
    }

    /// Polls events until the window is closed or escape is pressed.
    pub fn run_event_loop(&mut self) {
        while !self.window.should_close() {
            self.glfw.poll_events();
            for (_, event) in glfw::flush_messages(&self.receiver) {
                trace!("{:?}", event);
                if let WindowEvent::Key(Key::Escape, _, Action::Press, _) = event {
                    self.window.set_should_close(true);
                }
            }
        }
        debug!("Window closed");
    }
}
