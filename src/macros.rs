//! printf-style call macros.
//!
//! `jlo::infof!(logger, "took %dms", elapsed)` expands to
//! `logger.infof("took %dms", &[Arg::from(elapsed)])`.

/// Logs on `Debug` through [`Logger::debugf`](crate::Logger::debugf).
#[macro_export]
macro_rules! debugf {
    ($logger:expr, $template:expr $(,)?) => {
        $logger.debugf($template, &[])
    };
    ($logger:expr, $template:expr, $($arg:expr),+ $(,)?) => {
        $logger.debugf($template, &[$($crate::Arg::from($arg)),+])
    };
}

/// Logs on `Info` through [`Logger::infof`](crate::Logger::infof).
#[macro_export]
macro_rules! infof {
    ($logger:expr, $template:expr $(,)?) => {
        $logger.infof($template, &[])
    };
    ($logger:expr, $template:expr, $($arg:expr),+ $(,)?) => {
        $logger.infof($template, &[$($crate::Arg::from($arg)),+])
    };
}

/// Logs on `Warning` through [`Logger::warnf`](crate::Logger::warnf).
#[macro_export]
macro_rules! warnf {
    ($logger:expr, $template:expr $(,)?) => {
        $logger.warnf($template, &[])
    };
    ($logger:expr, $template:expr, $($arg:expr),+ $(,)?) => {
        $logger.warnf($template, &[$($crate::Arg::from($arg)),+])
    };
}

/// Logs on `Error` through [`Logger::errorf`](crate::Logger::errorf).
#[macro_export]
macro_rules! errorf {
    ($logger:expr, $template:expr $(,)?) => {
        $logger.errorf($template, &[])
    };
    ($logger:expr, $template:expr, $($arg:expr),+ $(,)?) => {
        $logger.errorf($template, &[$($crate::Arg::from($arg)),+])
    };
}

/// Logs on `Fatal` through [`Logger::fatalf`](crate::Logger::fatalf).
#[macro_export]
macro_rules! fatalf {
    ($logger:expr, $template:expr $(,)?) => {
        $logger.fatalf($template, &[])
    };
    ($logger:expr, $template:expr, $($arg:expr),+ $(,)?) => {
        $logger.fatalf($template, &[$($crate::Arg::from($arg)),+])
    };
}
