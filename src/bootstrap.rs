use crate::widget::GLOBAL_NAME;

/// Default wasm-bindgen (`--target web`) entry module, relative to the loader script.
pub const DEFAULT_MODULE: &str = "widget_loader.js";

const TEMPLATE: &str = r#"// Chat widget loader bootstrap
(function (global, document) {
  if (global.__GLOBAL__ && global.__GLOBAL__.__loader) return;
  const script = document.currentScript;
  const moduleUrl = new URL(__MODULE_URL__, script ? script.src : global.location.href).href;
  const queue = [];

  global.__GLOBAL__ = {
    __loader: true,
    init(config) { queue.push(["init", config]); },
    destroy() { queue.push(["destroy"]); },
  };

  import(moduleUrl)
    .then(async (mod) => {
      await mod.default();
      const handle = { __loader: true, init: mod.initWidget, destroy: mod.destroyWidget };
      global.__GLOBAL__ = handle;
      for (const [op, config] of queue.splice(0)) {
        try {
          if (op === "init") handle.init(config || {});
          else handle.destroy();
        } catch (err) {
          console.warn("__GLOBAL__: queued " + op + " failed", err);
        }
      }
    })
    .catch((err) => {
      console.warn("__GLOBAL__: failed to load widget module", err);
    });
})(window, document);
"#;

/// Script served as the loader entry point.
///
/// It installs the page-global handle immediately, queues `init` / `destroy`
/// calls made before the wasm module is ready, then replays them in order.
pub fn bootstrap_script(module_url: &str) -> String {
    let module_literal =
        serde_json::to_string(module_url).unwrap_or_else(|_| format!("\"{DEFAULT_MODULE}\""));
    TEMPLATE
        .replace("__GLOBAL__", GLOBAL_NAME)
        .replace("__MODULE_URL__", &module_literal)
}
