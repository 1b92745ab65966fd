//! Which screen is showing.

use log::debug;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Screen {
    #[default]
    Home,
    Folder(String),
    Camera,
}

#[derive(Debug, Default)]
pub struct ScreenState {
    current: Screen,
    /// Folder that was open most recently; default save target for captures.
    last_folder: Option<String>,
}

impl ScreenState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> &Screen {
        &self.current
    }

    pub fn go_home(&mut self) {
        self.switch(Screen::Home);
    }

    pub fn open_folder(&mut self, name: String) {
        self.last_folder = Some(name.clone());
        self.switch(Screen::Folder(name));
    }

    pub fn open_camera(&mut self) {
        self.switch(Screen::Camera);
    }

    /// Name of the folder currently on screen.
    pub fn open_folder_name(&self) -> Option<&str> {
        match &self.current {
            Screen::Folder(name) => Some(name),
            _ => None,
        }
    }

    pub fn last_folder(&self) -> Option<&str> {
        self.last_folder.as_deref()
    }

    fn switch(&mut self, next: Screen) {
        debug!("Screen {:?} -> {:?}", self.current, next);
        self.current = next;
    }
}
