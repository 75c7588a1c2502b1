pub fn render_index(year: i32, today: &str, current_period: Option<u32>) -> String {
    let current = current_period
        .map(|index| index.to_string())
        .unwrap_or_else(|| "null".to_string());
    INDEX_HTML
        .replace("{{YEAR}}", &year.to_string())
        .replace("{{TODAY}}", today)
        .replace("{{CURRENT}}", &current)
}

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>Xun Calendar {{YEAR}}</title>
  <style>
    @import url('https://fonts.googleapis.com/css2?family=Space+Grotesk:wght@400;500;600&family=Fraunces:wght@600&display=swap');

    :root {
      --bg-1: #f4f6f8;
      --bg-2: #d9e4f0;
      --ink: #28303a;
      --accent: #3b82f6;
      --accent-2: #2f4858;
      --good: #2d7a4b;
      --bad: #c63b2b;
      --card: rgba(255, 255, 255, 0.92);
      --shadow: 0 24px 60px rgba(47, 72, 88, 0.14);
    }

    * {
      box-sizing: border-box;
    }

    body {
      margin: 0;
      min-height: 100vh;
      background: radial-gradient(circle at top, var(--bg-2), transparent 60%),
        linear-gradient(135deg, var(--bg-1), #e8eef5 60%, #f2f4f7 100%);
      color: var(--ink);
      font-family: "Space Grotesk", "Trebuchet MS", sans-serif;
      display: grid;
      place-items: start center;
      padding: 32px 18px 48px;
    }

    .app {
      width: min(980px, 100%);
      background: var(--card);
      backdrop-filter: blur(12px);
      border-radius: 28px;
      box-shadow: var(--shadow);
      padding: 36px;
      display: grid;
      gap: 28px;
      animation: rise 600ms ease;
    }

    header {
      display: flex;
      flex-wrap: wrap;
      align-items: baseline;
      justify-content: space-between;
      gap: 6px;
    }

    h1 {
      font-family: "Fraunces", "Georgia", serif;
      font-weight: 600;
      font-size: clamp(1.8rem, 4vw, 2.6rem);
      margin: 0;
    }

    .subtitle {
      margin: 0;
      color: #5f6771;
      font-size: 1rem;
    }

    h2 {
      margin: 0 0 12px;
      font-size: 1.25rem;
    }

    .panel {
      display: grid;
      grid-template-columns: repeat(auto-fit, minmax(170px, 1fr));
      gap: 16px;
    }

    .stat {
      background: white;
      border-radius: 18px;
      padding: 18px;
      border: 1px solid rgba(47, 72, 88, 0.08);
      display: grid;
      gap: 8px;
    }

    .stat .label {
      font-size: 0.82rem;
      text-transform: uppercase;
      letter-spacing: 0.12em;
      color: #8b8f95;
    }

    .stat .value {
      font-size: 1.5rem;
      font-weight: 600;
      color: var(--accent-2);
    }

    .card {
      background: white;
      border-radius: 20px;
      padding: 20px;
      border: 1px solid rgba(47, 72, 88, 0.08);
    }

    #heatmap {
      display: flex;
      flex-wrap: wrap;
      gap: 3px;
    }

    #heatmap .day {
      width: 12px;
      height: 12px;
      border-radius: 2px;
      cursor: pointer;
      transition: transform 120ms ease;
    }

    #heatmap .day:hover {
      transform: scale(1.4);
    }

    #heatmap .day.today {
      outline: 2px solid var(--accent);
      outline-offset: 1px;
    }

    .period-nav {
      display: flex;
      align-items: center;
      justify-content: space-between;
      gap: 12px;
      margin-bottom: 14px;
    }

    .period-nav .range {
      font-size: 0.9rem;
      color: #6b7280;
    }

    button {
      appearance: none;
      border: none;
      border-radius: 999px;
      padding: 10px 18px;
      font-size: 0.95rem;
      font-weight: 600;
      cursor: pointer;
      background: var(--accent-2);
      color: white;
      transition: transform 150ms ease, box-shadow 150ms ease;
    }

    button:active {
      transform: scale(0.97);
    }

    button.primary {
      background: var(--accent);
      box-shadow: 0 10px 24px rgba(59, 130, 246, 0.3);
    }

    button.ghost {
      background: rgba(47, 72, 88, 0.08);
      color: var(--accent-2);
    }

    textarea,
    input[type="text"],
    input[type="number"] {
      width: 100%;
      border: 1px solid rgba(47, 72, 88, 0.15);
      border-radius: 12px;
      padding: 10px 12px;
      font: inherit;
      background: #fbfcfd;
    }

    textarea {
      resize: vertical;
      min-height: 64px;
    }

    .field {
      display: grid;
      gap: 6px;
      margin-bottom: 12px;
    }

    .field span {
      font-size: 0.85rem;
      color: #6b7280;
    }

    .grid-2 {
      display: grid;
      grid-template-columns: repeat(auto-fit, minmax(280px, 1fr));
      gap: 20px;
    }

    .metrics-row {
      display: grid;
      grid-template-columns: repeat(auto-fit, minmax(110px, 1fr));
      gap: 10px;
    }

    .mood-row {
      display: flex;
      gap: 8px;
      margin-bottom: 12px;
    }

    .mood-row button {
      background: rgba(47, 72, 88, 0.08);
      color: var(--accent-2);
      font-size: 1.2rem;
      padding: 8px 14px;
    }

    .mood-row button.active {
      background: var(--accent);
      color: white;
    }

    .check-row {
      display: flex;
      align-items: center;
      gap: 8px;
      margin-bottom: 8px;
      font-size: 0.95rem;
    }

    .tag-chip {
      display: inline-flex;
      align-items: center;
      gap: 6px;
      padding: 4px 12px;
      border-radius: 999px;
      background: rgba(47, 72, 88, 0.06);
      border: 1px solid rgba(47, 72, 88, 0.1);
      font-size: 0.88rem;
      margin: 0 6px 6px 0;
    }

    .tag-chip .count {
      background: rgba(47, 72, 88, 0.12);
      border-radius: 999px;
      padding: 0 7px;
      font-size: 0.78rem;
    }

    #chart {
      width: 100%;
      height: 240px;
      display: block;
    }

    .chart-line {
      fill: none;
      stroke-width: 2.5;
    }

    .chart-point {
      fill: white;
      stroke-width: 2;
    }

    .chart-grid {
      stroke: rgba(47, 72, 88, 0.12);
    }

    .chart-label {
      fill: #7a7f86;
      font-size: 11px;
      font-family: "Space Grotesk", sans-serif;
    }

    .mood-bars {
      display: flex;
      align-items: flex-end;
      gap: 10px;
      height: 120px;
      margin-top: 8px;
    }

    .mood-bars .bar {
      flex: 1;
      display: grid;
      gap: 4px;
      align-content: end;
      text-align: center;
      font-size: 0.8rem;
      color: #6b7280;
    }

    .mood-bars .bar i {
      display: block;
      background: var(--accent);
      border-radius: 6px 6px 0 0;
      min-height: 2px;
    }

    .journal-entry {
      display: flex;
      gap: 14px;
      padding: 12px;
      border-radius: 12px;
      background: #f7f9fb;
      border: 1px solid rgba(47, 72, 88, 0.06);
      margin-bottom: 10px;
    }

    .journal-entry .date {
      font-weight: 600;
      color: var(--accent-2);
      white-space: nowrap;
    }

    .empty-state {
      text-align: center;
      color: #6b7280;
      padding: 36px 0;
    }

    .status {
      font-size: 0.95rem;
      color: #6b645d;
      min-height: 1.2em;
    }

    .status[data-type="error"] {
      color: var(--bad);
    }

    .status[data-type="ok"] {
      color: var(--good);
    }

    .backup-row {
      display: flex;
      flex-wrap: wrap;
      gap: 10px;
      align-items: center;
    }

    @keyframes rise {
      from {
        opacity: 0;
        transform: translateY(18px);
      }
      to {
        opacity: 1;
        transform: translateY(0);
      }
    }

    @media (max-width: 640px) {
      .app {
        padding: 26px 20px;
      }
    }
  </style>
</head>
<body>
  <main class="app">
    <header>
      <div>
        <h1>Xun Calendar {{YEAR}}</h1>
        <p class="subtitle">The year in 10-day periods: one goal per xun, one check-in per day.</p>
      </div>
      <div class="backup-row">
        <button class="ghost" id="backup-btn" type="button">Download backup</button>
        <button class="ghost" id="restore-btn" type="button">Restore</button>
        <input type="file" id="restore-file" accept="application/json" hidden />
      </div>
    </header>

    <section class="panel">
      <div class="stat">
        <span class="label">Today</span>
        <span class="value" id="stat-today">{{TODAY}}</span>
      </div>
      <div class="stat">
        <span class="label">Current xun</span>
        <span class="value" id="stat-current">--</span>
      </div>
      <div class="stat">
        <span class="label">Days recorded</span>
        <span class="value" id="stat-recorded">0</span>
      </div>
      <div class="stat">
        <span class="label">Goal streak this xun</span>
        <span class="value" id="stat-streak">0</span>
      </div>
    </section>

    <section class="card">
      <h2>Year at a glance</h2>
      <div id="heatmap"></div>
    </section>

    <div class="grid-2">
      <section class="card">
        <div class="period-nav">
          <button class="ghost" id="prev-period" type="button">&larr;</button>
          <div>
            <h2 id="period-title">Xun 1</h2>
            <div class="range" id="period-range"></div>
          </div>
          <button class="ghost" id="next-period" type="button">&rarr;</button>
        </div>
        <div class="field">
          <span>Goal for this xun</span>
          <textarea id="goal-input" placeholder="What does done look like in 10 days?"></textarea>
        </div>
        <div class="field">
          <span>Remarks</span>
          <textarea id="remarks-input"></textarea>
        </div>
        <div class="field">
          <span>Tracked indicators (up to 3)</span>
          <input type="text" id="indicator-1" placeholder="e.g. run 3km" />
          <input type="text" id="indicator-2" />
          <input type="text" id="indicator-3" />
        </div>
        <button class="primary" id="save-goal" type="button">Save goal</button>
      </section>

      <section class="card">
        <h2>Check in &middot; {{TODAY}}</h2>
        <div class="mood-row" id="mood-row">
          <button type="button" data-mood="1">&#128555;</button>
          <button type="button" data-mood="2">&#128542;</button>
          <button type="button" data-mood="3">&#128528;</button>
          <button type="button" data-mood="4">&#128578;</button>
          <button type="button" data-mood="5">&#129321;</button>
        </div>
        <div class="check-row">
          <input type="checkbox" id="goal-checkin" />
          <label for="goal-checkin" id="goal-checkin-label">Worked toward the xun goal</label>
        </div>
        <div id="indicator-checks"></div>
        <div class="field">
          <span>Journal</span>
          <textarea id="journal-input"></textarea>
        </div>
        <div class="field">
          <span>Blockers</span>
          <input type="text" id="blockers-input" />
        </div>
        <div class="field metrics-row">
          <label>Sleep h<input type="number" id="metric-sleep" step="0.5" min="0" /></label>
          <label>Exercise min<input type="number" id="metric-exercise" min="0" /></label>
          <label>Reading min<input type="number" id="metric-reading" min="0" /></label>
          <label>Wealth &Delta;<input type="number" id="metric-wealth" step="0.01" /></label>
        </div>
        <button class="primary" id="save-day" type="button">Save check-in</button>
      </section>
    </div>

    <section class="card">
      <h2 id="summary-title">Xun review</h2>
      <div id="summary-body"></div>
    </section>

    <div class="status" id="status"></div>
    <p class="subtitle">Everything stays on this machine, one JSON file per state key.</p>
  </main>

  <script>
    const YEAR = {{YEAR}};
    const TODAY = '{{TODAY}}';
    const CURRENT = {{CURRENT}};

    const statusEl = document.getElementById('status');
    const heatmapEl = document.getElementById('heatmap');
    const summaryBody = document.getElementById('summary-body');

    let periodsData = null;
    let appState = null;
    let viewedIndex = CURRENT || 1;
    let selectedMood = null;

    const setStatus = (message, type) => {
      statusEl.textContent = message;
      statusEl.dataset.type = type || '';
      if (type === 'ok') {
        setTimeout(() => { statusEl.textContent = ''; }, 1500);
      }
    };

    const getJson = async (url) => {
      const res = await fetch(url);
      if (!res.ok) {
        throw new Error(await res.text() || ('Request failed: ' + url));
      }
      return res.json();
    };

    const sendJson = async (method, url, body) => {
      const res = await fetch(url, {
        method,
        headers: { 'content-type': 'application/json' },
        body: JSON.stringify(body)
      });
      if (!res.ok) {
        throw new Error(await res.text() || 'Request failed');
      }
      return res.json();
    };

    const pad2 = (n) => String(n).padStart(2, '0');
    // local calendar fields, never toISOString: UTC conversion shifts the
    // key near midnight in non-UTC zones
    const formatLocalDate = (d) =>
      d.getFullYear() + '-' + pad2(d.getMonth() + 1) + '-' + pad2(d.getDate());

    const hasData = (record) => {
      if (!record) return false;
      return Boolean(
        record.mood ||
        (record.journal && record.journal.length) ||
        record.weather ||
        record.goal_checkin ||
        (record.indicator_checkins || []).some(Boolean) ||
        (record.keywords || []).length ||
        (record.custom_activities || []).length ||
        (record.blockers && record.blockers.length)
      );
    };

    const periodFor = (dateStr) =>
      periodsData.periods.find((p) => p.start_date <= dateStr && dateStr <= p.end_date);

    const renderHeatmap = () => {
      heatmapEl.innerHTML = '';
      for (const period of periodsData.periods) {
        const hue = (period.index * 10) % 360;
        let cursor = new Date(period.start_date + 'T00:00:00');
        for (let i = 0; i < period.day_count; i += 1) {
          const dateStr = formatLocalDate(cursor);
          const el = document.createElement('div');
          el.className = 'day';
          const recorded = hasData(appState.day_records[dateStr]);
          el.style.backgroundColor = recorded
            ? 'hsl(' + hue + ', 80%, 55%)'
            : 'hsl(' + hue + ', 70%, 90%)';
          if (dateStr === TODAY) {
            el.classList.add('today');
          }
          el.title = dateStr + ' (xun ' + period.index + ')';
          el.onclick = () => { viewedIndex = period.index; renderPeriod(); };
          heatmapEl.appendChild(el);
          cursor.setDate(cursor.getDate() + 1);
        }
      }
    };

    const renderStats = () => {
      document.getElementById('stat-current').textContent =
        CURRENT ? 'Xun ' + CURRENT : 'Off-year';
      const recorded = Object.values(appState.day_records).filter(hasData).length;
      document.getElementById('stat-recorded').textContent = recorded;

      let streak = 0;
      const period = CURRENT && periodsData.periods[CURRENT - 1];
      if (period) {
        let cursor = new Date(period.start_date + 'T00:00:00');
        for (let i = 0; i < period.day_count; i += 1) {
          const dateStr = formatLocalDate(cursor);
          if (dateStr > TODAY) break;
          const record = appState.day_records[dateStr];
          if (record && record.goal_checkin) streak += 1;
          cursor.setDate(cursor.getDate() + 1);
        }
      }
      document.getElementById('stat-streak').textContent = streak;
    };

    const goalOf = (index) => appState.period_goals[index] || { goal: '', remarks: '', indicators: [] };

    const renderPeriod = () => {
      const period = periodsData.periods[viewedIndex - 1];
      document.getElementById('period-title').textContent = 'Xun ' + period.index;
      document.getElementById('period-range').textContent =
        period.start_date + ' to ' + period.end_date + ' (' + period.day_count + ' days)';

      const goal = goalOf(period.index);
      document.getElementById('goal-input').value = goal.goal || '';
      document.getElementById('remarks-input').value = goal.remarks || '';
      for (let i = 0; i < 3; i += 1) {
        document.getElementById('indicator-' + (i + 1)).value = (goal.indicators || [])[i] || '';
      }

      renderSummary();

      fetch('/api/view', {
        method: 'PUT',
        headers: { 'content-type': 'application/json' },
        body: JSON.stringify({ viewed_period_index: viewedIndex })
      }).catch(() => {});
    };

    const renderCheckin = () => {
      const record = appState.day_records[TODAY] || {};
      selectedMood = record.mood || null;
      document.querySelectorAll('#mood-row button').forEach((btn) => {
        btn.classList.toggle('active', Number(btn.dataset.mood) === selectedMood);
      });
      document.getElementById('goal-checkin').checked = Boolean(record.goal_checkin);
      document.getElementById('journal-input').value = record.journal || '';
      document.getElementById('blockers-input').value = record.blockers || '';
      const metrics = record.metrics || {};
      document.getElementById('metric-sleep').value = metrics.sleep_hours || '';
      document.getElementById('metric-exercise').value = metrics.exercise_minutes || '';
      document.getElementById('metric-reading').value = metrics.reading_minutes || '';
      document.getElementById('metric-wealth').value = metrics.wealth_delta || '';

      const container = document.getElementById('indicator-checks');
      container.innerHTML = '';
      const todayPeriod = periodFor(TODAY);
      const indicators = todayPeriod ? (goalOf(todayPeriod.index).indicators || []) : [];
      const checks = record.indicator_checkins || [];
      indicators.forEach((name, i) => {
        if (!name) return;
        const row = document.createElement('div');
        row.className = 'check-row';
        const box = document.createElement('input');
        box.type = 'checkbox';
        box.id = 'ind-check-' + i;
        box.dataset.slot = i;
        box.checked = Boolean(checks[i]);
        const label = document.createElement('label');
        label.htmlFor = box.id;
        label.textContent = name;
        row.appendChild(box);
        row.appendChild(label);
        container.appendChild(row);
      });
    };

    const gapPaths = (points, x, y) => {
      // one path segment per run of non-null values, so charts keep gaps
      let d = '';
      let pen = false;
      points.forEach((value, i) => {
        if (value === null || value === undefined) {
          pen = false;
          return;
        }
        d += (pen ? ' L ' : ' M ') + x(i).toFixed(2) + ' ' + y(value).toFixed(2);
        pen = true;
      });
      return d;
    };

    const renderTrendChart = (summary) => {
      const width = 620;
      const height = 240;
      const paddingX = 40;
      const paddingY = 30;
      const series = [
        { data: summary.sleep_series, color: '#60A5FA' },
        { data: summary.exercise_series, color: '#34D399' },
        { data: summary.reading_series, color: '#FBBF24' }
      ];

      const values = series.flatMap((s) => s.data.filter((v) => v !== null));
      if (!values.length) {
        return '';
      }
      let max = Math.max(...values, 1);
      const count = summary.dates.length;
      const xStep = count > 1 ? (width - paddingX * 2) / (count - 1) : 0;
      const x = (i) => paddingX + i * xStep;
      const y = (v) => height - paddingY - (v / max) * (height - paddingY * 2);

      let grid = '';
      for (let i = 0; i <= 4; i += 1) {
        const value = (max * i) / 4;
        const yPos = y(value);
        grid += '<line class="chart-grid" x1="' + paddingX + '" y1="' + yPos +
          '" x2="' + (width - paddingX) + '" y2="' + yPos + '" />';
        grid += '<text class="chart-label" x="' + (paddingX - 8) + '" y="' + (yPos + 4) +
          '" text-anchor="end">' + Math.round(value) + '</text>';
      }

      const labelEvery = count > 10 ? 2 : 1;
      const labels = summary.dates.map((label, i) =>
        i % labelEvery === 0
          ? '<text class="chart-label" x="' + x(i) + '" y="' + (height - paddingY + 16) +
            '" text-anchor="middle">' + label + '</text>'
          : ''
      ).join('');

      const paths = series.map((s) =>
        '<path class="chart-line" stroke="' + s.color + '" d="' + gapPaths(s.data, x, y) + '" />'
      ).join('');

      const dots = series.map((s) =>
        s.data.map((value, i) =>
          value === null
            ? ''
            : '<circle class="chart-point" stroke="' + s.color + '" cx="' + x(i) +
              '" cy="' + y(value) + '" r="3" />'
        ).join('')
      ).join('');

      return '<svg id="chart" viewBox="0 0 ' + width + ' ' + height + '" role="img">' +
        grid + paths + dots + labels + '</svg>';
    };

    const renderSummary = async () => {
      document.getElementById('summary-title').textContent = 'Xun ' + viewedIndex + ' review';
      let summary;
      try {
        summary = await getJson('/api/summary/' + viewedIndex);
      } catch (err) {
        setStatus(err.message, 'error');
        return;
      }

      if (!summary.has_any_data) {
        summaryBody.innerHTML =
          '<div class="empty-state">No records in this xun yet. Take it easy.</div>';
        return;
      }

      const avgSleep = summary.average_sleep === null ? '--' : summary.average_sleep.toFixed(1);
      const wealth = summary.total_wealth_delta;
      let html =
        '<div class="panel">' +
          '<div class="stat"><span class="label">Avg sleep</span><span class="value">' +
            avgSleep + ' h</span></div>' +
          '<div class="stat"><span class="label">Exercise</span><span class="value">' +
            summary.total_exercise_minutes + ' min</span></div>' +
          '<div class="stat"><span class="label">Reading</span><span class="value">' +
            summary.total_reading_minutes + ' min</span></div>' +
          '<div class="stat"><span class="label">Wealth</span><span class="value">' +
            (wealth > 0 ? '+' : '') + wealth.toFixed(0) + '</span></div>' +
        '</div>';

      const moodMax = Math.max(...summary.mood_histogram, 1);
      html += '<h2 style="margin-top:20px">Mood distribution</h2><div class="mood-bars">' +
        summary.mood_histogram.map((count, i) =>
          '<div class="bar"><i style="height:' + Math.round((count / moodMax) * 100) +
          '%"></i><span>' + (i + 1) + ' (' + count + ')</span></div>'
        ).join('') + '</div>';

      const emotions = Object.entries(summary.emotion_frequency)
        .sort((a, b) => b[1] - a[1]);
      if (emotions.length) {
        html += '<h2 style="margin-top:20px">Emotions</h2><div>' +
          emotions.map(([tag, count]) =>
            '<span class="tag-chip">' + tag + '<span class="count">' + count + '</span></span>'
          ).join('') + '</div>';
      }

      const chart = renderTrendChart(summary);
      if (chart) {
        html += '<h2 style="margin-top:20px">Trends</h2>' + chart;
      }

      if (summary.journal_entries.length) {
        html += '<h2 style="margin-top:20px">Journal</h2>' +
          summary.journal_entries.map((entry) =>
            '<div class="journal-entry"><span class="date">' + entry.date.slice(5) +
            '</span><span>' + entry.content + '</span></div>'
          ).join('');
      }

      summaryBody.innerHTML = html;
    };

    const saveGoal = async () => {
      const body = {
        goal: document.getElementById('goal-input').value,
        remarks: document.getElementById('remarks-input').value,
        indicators: [1, 2, 3].map((i) => document.getElementById('indicator-' + i).value.trim())
      };
      try {
        await sendJson('PUT', '/api/goal/' + viewedIndex, body);
        await reloadState();
        setStatus('Goal saved', 'ok');
      } catch (err) {
        setStatus(err.message, 'error');
      }
    };

    const saveDay = async () => {
      const metrics = {
        sleep_hours: parseFloat(document.getElementById('metric-sleep').value) || 0,
        exercise_minutes: parseInt(document.getElementById('metric-exercise').value, 10) || 0,
        reading_minutes: parseInt(document.getElementById('metric-reading').value, 10) || 0,
        wealth_delta: parseFloat(document.getElementById('metric-wealth').value) || 0,
        social_note: ''
      };
      const checks = [false, false, false];
      document.querySelectorAll('#indicator-checks input').forEach((box) => {
        checks[Number(box.dataset.slot)] = box.checked;
      });
      const body = {
        mood: selectedMood || undefined,
        journal: document.getElementById('journal-input').value,
        blockers: document.getElementById('blockers-input').value,
        goal_checkin: document.getElementById('goal-checkin').checked,
        indicator_checkins: checks,
        metrics
      };
      try {
        await sendJson('PUT', '/api/day/' + TODAY, body);
        await reloadState();
        setStatus('Check-in saved', 'ok');
      } catch (err) {
        setStatus(err.message, 'error');
      }
    };

    const downloadBackup = async () => {
      const res = await fetch('/api/backup');
      const blob = await res.blob();
      const url = URL.createObjectURL(blob);
      const a = document.createElement('a');
      a.href = url;
      a.download = 'backup_' + TODAY + '.json';
      a.click();
      URL.revokeObjectURL(url);
    };

    const restoreBackup = async (file) => {
      const text = await file.text();
      try {
        const res = await fetch('/api/backup/restore', { method: 'POST', body: text });
        if (!res.ok) {
          throw new Error(await res.text());
        }
        await reloadState();
        setStatus('Backup restored', 'ok');
      } catch (err) {
        setStatus(err.message, 'error');
      }
    };

    const reloadState = async () => {
      appState = await getJson('/api/state');
      renderHeatmap();
      renderStats();
      renderCheckin();
      renderPeriod();
    };

    const init = async () => {
      periodsData = await getJson('/api/periods');
      await reloadState();
    };

    document.getElementById('prev-period').onclick = () => {
      if (viewedIndex > 1) { viewedIndex -= 1; renderPeriod(); }
    };
    document.getElementById('next-period').onclick = () => {
      if (viewedIndex < periodsData.periods.length) { viewedIndex += 1; renderPeriod(); }
    };
    document.querySelectorAll('#mood-row button').forEach((btn) => {
      btn.onclick = () => {
        const mood = Number(btn.dataset.mood);
        selectedMood = selectedMood === mood ? null : mood;
        document.querySelectorAll('#mood-row button').forEach((b) =>
          b.classList.toggle('active', Number(b.dataset.mood) === selectedMood));
      };
    });
    document.getElementById('save-goal').onclick = saveGoal;
    document.getElementById('save-day').onclick = saveDay;
    document.getElementById('backup-btn').onclick = () =>
      downloadBackup().catch((err) => setStatus(err.message, 'error'));
    document.getElementById('restore-btn').onclick = () =>
      document.getElementById('restore-file').click();
    document.getElementById('restore-file').onchange = (event) => {
      if (event.target.files.length) {
        restoreBackup(event.target.files[0]);
        event.target.value = '';
      }
    };

    init().catch((err) => setStatus(err.message, 'error'));
  </script>
</body>
</html>
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_fills_placeholders() {
        let html = render_index(2026, "2026-05-11", Some(14));
        assert!(html.contains("Xun Calendar 2026"));
        assert!(html.contains("const TODAY = '2026-05-11';"));
        assert!(html.contains("const CURRENT = 14;"));
        assert!(!html.contains("{{"));
    }

    #[test]
    fn render_handles_off_year_today() {
        let html = render_index(2026, "2027-01-01", None);
        assert!(html.contains("const CURRENT = null;"));
    }
}
