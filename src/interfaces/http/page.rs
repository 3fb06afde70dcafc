// Static dashboard layout. Charts are drawn by plotly.js from the ChartSpec
// returned by the `/api` routes; all state lives server-side per session.

use crate::domain::chart_spec::palette;
use crate::domain::view::ActiveView;

const PAGE_TEMPLATE: &str = r#"<!DOCTYPE html>
<html lang="fr">
<head>
<meta charset="utf-8">
<title>Dashboard d'analyse des germes et antibiotiques</title>
<script src="https://cdn.plot.ly/plotly-2.35.2.min.js"></script>
<style>
  body { font-family: Helvetica, sans-serif; background: {{background}}; color: {{text}}; padding: 20px; margin: 0; }
  h1 { text-align: center; color: {{primary}}; margin-bottom: 20px; }
  .tabs { display: flex; }
  .tab { flex: 1; padding: 10px; border: none; cursor: pointer; background: {{primary2}}; color: white; font-size: 15px; }
  .tab.selected { background: {{primary}}; }
  #content { margin-top: 20px; }
  .filters { width: 20%; display: inline-block; vertical-align: top; padding: 20px; box-sizing: border-box; }
  .chart { width: 75%; display: inline-block; padding: 20px; box-sizing: border-box; }
  .filters label { display: block; margin-top: 12px; }
  .dropdown { display: flex; }
  .dropdown select { flex: 1; background: white; color: {{text}}; padding: 4px; }
  .dropdown button { border: none; background: none; cursor: pointer; color: {{text}}; }
  #error { color: {{secondary}}; }
</style>
</head>
<body>
<h1>Dashboard d'analyse des germes et antibiotiques</h1>
<div class="tabs">
  <button class="tab" data-view="occurrence">{{occurrence_label}}</button>
  <button class="tab" data-view="antibiotic_results">{{antibiotic_label}}</button>
</div>
<div id="error"></div>
<div id="content"></div>
<script>
(function () {
  let sessionId = null;

  async function call(method, path, body) {
    const response = await fetch('/api' + path, {
      method,
      headers: { 'Content-Type': 'application/json' },
      body: body === undefined ? undefined : JSON.stringify(body),
    });
    if (!response.ok) {
      throw new Error(await response.text());
    }
    return response.json();
  }

  function toPlotly(spec) {
    const traces = spec.series.map((series) => ({
      type: 'bar',
      name: series.name,
      x: series.points.map((p) => p.x),
      y: series.points.map((p) => p.y),
      text: series.points.map((p) => p.text),
      marker: { color: series.color },
      textposition: spec.bar_text ? spec.bar_text.position : 'none',
      textfont: spec.bar_text ? { size: spec.bar_text.size, color: spec.bar_text.color } : undefined,
      showlegend: spec.color_field !== null,
    }));
    const layout = {
      title: { text: spec.title },
      barmode: spec.bar_mode,
      xaxis: { title: { text: spec.x_axis.title }, categoryorder: 'array', categoryarray: spec.x_axis.categories },
      yaxis: { title: { text: spec.y_axis.title } },
      legend: { title: { text: spec.color_field || '' }, traceorder: 'normal' },
      plot_bgcolor: spec.layout.plot_background,
      paper_bgcolor: spec.layout.paper_background,
      font: { color: spec.layout.font_color },
    };
    if (spec.layout.uniform_text_min_size !== null) {
      layout.uniformtext = { minsize: spec.layout.uniform_text_min_size, mode: spec.layout.uniform_text_mode };
    }
    return { traces, layout };
  }

  function drawChart(target, spec) {
    const { traces, layout } = toPlotly(spec);
    Plotly.react(target, traces, layout);
  }

  function dropdown(control) {
    const wrapper = document.createElement('div');
    const label = document.createElement('label');
    label.textContent = control.label;
    const row = document.createElement('div');
    row.className = 'dropdown';
    const select = document.createElement('select');
    control.options.forEach((option, index) => {
      const item = document.createElement('option');
      item.value = String(index);
      item.textContent = option.label;
      if (JSON.stringify(option.value) === JSON.stringify(control.selected)) {
        item.selected = true;
      }
      select.appendChild(item);
    });
    select.addEventListener('change', () => {
      const option = control.options[Number(select.value)];
      update('PUT', '/sessions/' + sessionId + '/controls/' + control.control, { input: option.value });
    });
    const clear = document.createElement('button');
    clear.textContent = '×';
    clear.title = 'Effacer';
    clear.addEventListener('click', () => {
      update('PUT', '/sessions/' + sessionId + '/controls/' + control.control, { input: null });
    });
    row.append(select, clear);
    wrapper.append(label, row);
    return wrapper;
  }

  function modeToggle(mode) {
    const wrapper = document.createElement('div');
    const label = document.createElement('label');
    label.textContent = mode.label;
    wrapper.appendChild(label);
    mode.options.forEach((option) => {
      const item = document.createElement('label');
      const radio = document.createElement('input');
      radio.type = 'radio';
      radio.name = 'barmode';
      radio.checked = option.value === mode.selected;
      radio.addEventListener('change', () => {
        update('PUT', '/sessions/' + sessionId + '/mode', { mode: option.value });
      });
      item.append(radio, ' ' + option.label);
      wrapper.appendChild(item);
    });
    return wrapper;
  }

  function render(view) {
    document.querySelectorAll('.tab').forEach((tab) => {
      tab.classList.toggle('selected', tab.dataset.view === view.view);
    });
    const content = document.getElementById('content');
    content.innerHTML = '';
    const chart = document.createElement('div');
    if (view.view === 'occurrence') {
      content.appendChild(chart);
    } else {
      const filters = document.createElement('div');
      filters.className = 'filters';
      view.dropdowns.forEach((control) => filters.appendChild(dropdown(control)));
      filters.appendChild(modeToggle(view.mode));
      chart.className = 'chart';
      content.append(filters, chart);
    }
    drawChart(chart, view.chart);
  }

  async function update(method, path, body) {
    try {
      render(await call(method, path, body));
      document.getElementById('error').textContent = '';
    } catch (err) {
      document.getElementById('error').textContent = err.message;
    }
  }

  document.querySelectorAll('.tab').forEach((tab) => {
    tab.addEventListener('click', () => {
      update('PUT', '/sessions/' + sessionId + '/view', { view: tab.dataset.view });
    });
  });

  window.addEventListener('beforeunload', () => {
    if (sessionId) {
      fetch('/api/sessions/' + sessionId, { method: 'DELETE', keepalive: true });
    }
  });

  call('POST', '/sessions')
    .then((created) => {
      sessionId = created.session_id;
      render(created.view);
    })
    .catch((err) => {
      document.getElementById('error').textContent = err.message;
    });
})();
</script>
</body>
</html>
"#;

pub fn render_page() -> String {
    PAGE_TEMPLATE
        .replace("{{background}}", palette::BACKGROUND)
        .replace("{{text}}", palette::TEXT)
        .replace("{{primary}}", palette::PRIMARY)
        .replace("{{primary2}}", palette::PRIMARY2)
        .replace("{{secondary}}", palette::SECONDARY)
        .replace("{{occurrence_label}}", ActiveView::Occurrence.label())
        .replace("{{antibiotic_label}}", ActiveView::AntibioticResults.label())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placeholders_are_filled() {
        let page = render_page();
        assert!(!page.contains("{{"));
        assert!(page.contains("Occurrences des germes"));
        assert!(page.contains(palette::PRIMARY));
    }
}
