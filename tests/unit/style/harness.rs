/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

use std::sync::Arc;
use style::SharedStyleContext;
use style::error_reporting::CollectingReporter;
use style::values::{Color, StyleValue};
use style_config::Preferences;

/// A context whose errors are kept by the returned reporter.
pub fn context_with(prefs: Preferences) -> (SharedStyleContext, Arc<CollectingReporter>) {
    let _ = env_logger::builder().is_test(true).try_init();
    let reporter = Arc::new(CollectingReporter::new());
    let context = SharedStyleContext::new(prefs, Box::new(reporter.clone()));
    (context, reporter)
}

pub fn context() -> (SharedStyleContext, Arc<CollectingReporter>) {
    context_with(Preferences::default())
}

pub fn color(color: Color) -> Option<StyleValue> {
    Some(StyleValue::Color(color))
}
