use std::{collections::BTreeMap, fmt, io, sync::Arc};

#[derive(Debug, Clone)]
pub struct ViewerError {
    pub key: &'static str,
    pub args: BTreeMap<&'static str, String>,
    pub causes: Vec<ViewerCause>,
}

#[derive(Debug, Clone)]
pub enum ViewerCause {
    Viewer(Box<ViewerError>),
    Std(Arc<dyn std::error::Error + Send + Sync>),
}

impl ViewerError {
    pub fn new(key: &'static str) -> Self {
        Self {
            key,
            args: BTreeMap::new(),
            causes: Vec::new(),
        }
    }

    pub fn with_arg(mut self, k: &'static str, v: impl ToString) -> Self {
        self.args.insert(k, v.to_string());
        self
    }

    #[allow(dead_code)]
    pub fn push_viewer(mut self, cause: ViewerError) -> Self {
        self.causes.push(ViewerCause::Viewer(Box::new(cause)));
        self
    }

    pub fn push_std(mut self, cause: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.causes.push(ViewerCause::Std(Arc::new(cause)));
        self
    }
}

impl fmt::Display for ViewerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.key)?;
        let mut first = true;
        for (k, v) in &self.args {
            if !first {
                write!(f, ", ")?;
            }
            first = false;
            write!(f, "{k}={v}")?;
        }
        write!(f, ")")?;
        for cause in &self.causes {
            match cause {
                ViewerCause::Viewer(e) => write!(f, ": {e}")?,
                ViewerCause::Std(e) => write!(f, ": {e}")?,
            }
        }
        Ok(())
    }
}

impl std::error::Error for ViewerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.causes.iter().find_map(|c| match c {
            ViewerCause::Viewer(e) => Some(e.as_ref() as &dyn std::error::Error),
            ViewerCause::Std(e) => Some(e.as_ref()),
        })
    }
}

impl From<String> for ViewerError {
    fn from(s: String) -> Self {
        ViewerError::new("string-error").with_arg("msg", s)
    }
}

impl From<&str> for ViewerError {
    fn from(s: &str) -> Self {
        ViewerError::new("str-error").with_arg("msg", s)
    }
}

impl From<io::Error> for ViewerError {
    fn from(err: io::Error) -> Self {
        ViewerError::new("io-error").push_std(err)
    }
}

impl From<wgpu::CreateSurfaceError> for ViewerError {
    fn from(err: wgpu::CreateSurfaceError) -> Self {
        ViewerError::new("wgpu::CreateSurfaceError").push_std(err)
    }
}

impl From<wgpu::RequestAdapterError> for ViewerError {
    fn from(err: wgpu::RequestAdapterError) -> Self {
        ViewerError::new("wgpu::RequestAdapterError").push_std(err)
    }
}

impl From<wgpu::RequestDeviceError> for ViewerError {
    fn from(err: wgpu::RequestDeviceError) -> Self {
        ViewerError::new("wgpu::RequestDeviceError").push_std(err)
    }
}

impl From<crate::parser::obj::ObjError> for ViewerError {
    fn from(err: crate::parser::obj::ObjError) -> Self {
        ViewerError::new("obj-error").push_std(err)
    }
}

impl From<crate::scene::SceneError> for ViewerError {
    fn from(err: crate::scene::SceneError) -> Self {
        ViewerError::new("scene-error").push_std(err)
    }
}
