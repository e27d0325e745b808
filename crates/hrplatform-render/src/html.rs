//! Page shell and shared markup helpers.
//!
//! The site is one self-contained HTML document with CSS and JS inlined.
//! Sections are pre-rendered on the Rust side; the inline script only
//! switches between them, applies filters and runs the quiz.

use hrplatform_core::model::{Language, Theme};
use hrplatform_core::router::Section;
use serde::Serialize;

/// Escape a string for safe HTML insertion.
pub fn escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

/// Coordinate formatting for SVG attributes.
pub(crate) fn num(v: f64) -> String {
    let s = format!("{v:.1}");
    s.strip_suffix(".0").map(str::to_string).unwrap_or(s)
}

/// A `<script type="application/json">` block holding `value`.
pub fn json_script<T: Serialize>(id: &str, value: &T) -> String {
    let json = serde_json::to_string(value)
        .unwrap_or_else(|_| "null".to_string())
        .replace("</", "<\\/");
    format!("<script type=\"application/json\" id=\"{id}\">{json}</script>\n")
}

/// Document-level settings.
#[derive(Debug, Clone, Copy)]
pub struct Shell<'a> {
    pub title: &'a str,
    pub theme: Theme,
    pub language: Language,
    /// Section shown when the URL carries no fragment.
    pub active: Section,
}

/// Assemble the full document. Sections with an empty body are left out
/// together with their navigation link.
pub fn document(shell: &Shell<'_>, sections: &[(Section, String)], data_blocks: &str) -> String {
    let mut html = String::new();

    html.push_str("<!DOCTYPE html>\n");
    html.push_str(&format!(
        "<html lang=\"{}\" data-theme=\"{}\">\n<head>\n",
        shell.language, shell.theme
    ));
    html.push_str("<meta charset=\"utf-8\">\n");
    html.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n");
    html.push_str(&format!("<title>{}</title>\n", escape(shell.title)));
    html.push_str("<style>\n");
    html.push_str(CSS);
    html.push_str("</style>\n");
    html.push_str("</head>\n<body>\n");

    // Navigation
    html.push_str("<nav class=\"navbar\">\n");
    html.push_str(&format!(
        "<a class=\"brand\" href=\"#home\">{}</a>\n",
        escape(shell.title)
    ));
    html.push_str("<ul class=\"nav-links\" id=\"navLinks\">\n");
    for (section, body) in sections {
        if body.is_empty() {
            continue;
        }
        let active = if *section == shell.active { " active" } else { "" };
        html.push_str(&format!(
            "<li><a class=\"nav-link{active}\" href=\"{}\" data-section=\"{}\">{}</a></li>\n",
            section.fragment(),
            section.id(),
            section.title()
        ));
    }
    html.push_str("</ul>\n");
    html.push_str("<div class=\"nav-tools\">\n");
    html.push_str(
        "<div class=\"search\"><input type=\"search\" id=\"globalSearch\" placeholder=\"Search treaties, bodies, events...\" autocomplete=\"off\">\
         <div class=\"search-results\" id=\"searchResults\"></div></div>\n",
    );
    html.push_str("<button class=\"theme-toggle\" id=\"themeToggle\" title=\"Toggle theme\">&#9680;</button>\n");
    html.push_str("</div>\n</nav>\n");

    html.push_str("<main>\n");
    for (section, body) in sections {
        if body.is_empty() {
            continue;
        }
        let active = if *section == shell.active { " active" } else { "" };
        html.push_str(&format!(
            "<section class=\"section{active}\" id=\"{}\">\n",
            section.id()
        ));
        html.push_str(body);
        html.push_str("</section>\n");
    }
    html.push_str("</main>\n");

    html.push_str(
        "<div class=\"modal\" id=\"detailModal\"><div class=\"modal-backdrop\"></div>\
         <div class=\"modal-content\"><button class=\"modal-close\" id=\"closeModal\">&times;</button>\
         <div id=\"modalBody\"></div></div></div>\n",
    );
    html.push_str("<div class=\"toast\" id=\"toast\"></div>\n");

    html.push_str(data_blocks);
    html.push_str("<script>\n");
    html.push_str(JS);
    html.push_str("</script>\n");
    html.push_str("</body>\n</html>\n");
    html
}

const CSS: &str = r#"
:root { --bg: #fff; --fg: #1f2937; --muted: #6b7280; --card: #f9fafb; --border: #e5e7eb; --accent: #3B82F6; }
[data-theme="dark"] { --bg: #111827; --fg: #f9fafb; --muted: #9ca3af; --card: #1f2937; --border: #374151; }
body { font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', sans-serif; margin: 0; background: var(--bg); color: var(--fg); }
.navbar { display: flex; align-items: center; gap: 1rem; padding: 0.75rem 2rem; border-bottom: 1px solid var(--border); position: sticky; top: 0; background: var(--bg); z-index: 10; }
.brand { font-weight: 700; color: var(--fg); text-decoration: none; }
.nav-links { display: flex; gap: 0.5rem; list-style: none; margin: 0; padding: 0; flex: 1; }
.nav-link { color: var(--muted); text-decoration: none; padding: 0.4rem 0.75rem; border-radius: 6px; }
.nav-link.active { color: var(--fg); background: var(--card); }
.nav-tools { display: flex; gap: 0.5rem; align-items: center; }
.search { position: relative; }
.search input { padding: 0.4rem 0.75rem; border: 1px solid var(--border); border-radius: 6px; background: var(--bg); color: var(--fg); }
.search-results { display: none; position: absolute; right: 0; width: 360px; background: var(--bg); border: 1px solid var(--border); border-radius: 8px; max-height: 60vh; overflow-y: auto; }
.search-results.active { display: block; }
.search-result-item { padding: 0.5rem 0.75rem; cursor: pointer; border-bottom: 1px solid var(--border); }
.search-result-subtitle, .search-result-type { font-size: 12px; color: var(--muted); }
main { padding: 2rem; }
.section { display: none; }
.section.active { display: block; }
.filter-btn, .view-btn, button { cursor: pointer; border: 1px solid var(--border); background: var(--card); color: var(--fg); border-radius: 6px; padding: 0.35rem 0.75rem; }
.filter-btn.active, .view-btn.active { background: var(--accent); color: #fff; }
.toolbar { display: flex; flex-wrap: wrap; gap: 0.5rem; margin: 1rem 0; }
.cards, .treaties-grid, .cases-grid { display: grid; grid-template-columns: repeat(auto-fill, minmax(260px, 1fr)); gap: 1rem; }
.card, .treaty-card, .case-card { border: 1px solid var(--border); border-radius: 10px; padding: 1rem; background: var(--card); cursor: pointer; }
.treaty-system-badge, .badge { display: inline-block; font-size: 12px; text-transform: uppercase; padding: 2px 8px; border-radius: 999px; background: var(--border); }
.era-blocks { display: grid; gap: 1rem; }
.era-block { border-left: 6px solid var(--era); padding: 0.75rem 1rem; background: var(--card); border-radius: 8px; cursor: pointer; }
.era-block .era-events { display: none; }
.era-block.expanded .era-events { display: block; }
.era-block.expanded .era-preview { display: none; }
.era-event { padding: 4px 0; }
.era-overflow { color: var(--muted); font-size: 13px; }
.timeline-scroller { overflow-x: auto; cursor: grab; border: 1px solid var(--border); border-radius: 8px; }
.timeline-scroller.dragging { cursor: grabbing; }
[hidden] { display: none !important; }
.zoom-marker, .stacked-mark { cursor: pointer; }
.web-container svg { width: 100%; height: auto; border: 1px solid var(--border); border-radius: 8px; }
.node.dimmed { opacity: 0.1; }
.link.highlighted { stroke-opacity: 1; stroke: var(--accent); }
.node-detail, .treaty-detail, .event-detail { display: none; }
.quiz-option { display: block; width: 100%; text-align: left; margin: 0.4rem 0; }
.quiz-option.correct { background: #10B981; color: #fff; }
.quiz-option.incorrect { background: #EF4444; color: #fff; }
.quiz-option:disabled { cursor: default; }
.exam-tip { margin-top: 0.5rem; padding: 0.5rem 0.75rem; border-left: 4px solid #F59E0B; background: var(--card); font-size: 14px; }
.progress-bar { height: 6px; background: var(--border); border-radius: 3px; }
.progress-bar span { display: block; height: 100%; background: var(--accent); border-radius: 3px; }
.stats-grid { display: grid; grid-template-columns: repeat(4, 1fr); gap: 1rem; }
.stat-value { font-size: 1.5rem; font-weight: 700; display: block; }
.stat-label { color: var(--muted); font-size: 13px; }
.modal { display: none; position: fixed; inset: 0; z-index: 20; }
.modal.open { display: block; }
.modal-backdrop { position: absolute; inset: 0; background: rgba(0,0,0,0.5); }
.modal-content { position: relative; max-width: 720px; margin: 5vh auto; background: var(--bg); border-radius: 12px; padding: 2rem; max-height: 85vh; overflow-y: auto; }
.modal-close { position: absolute; top: 1rem; right: 1rem; }
.toast { position: fixed; bottom: 2rem; left: 50%; transform: translateX(-50%); background: #1f2937; color: #fff; padding: 0.75rem 1.25rem; border-radius: 8px; display: none; }
.toast.show { display: block; }
.review-item { padding: 0.75rem; border-radius: 8px; margin-bottom: 0.5rem; }
.review-item.correct { background: rgba(16, 185, 129, 0.1); }
.review-item.incorrect { background: rgba(239, 68, 68, 0.1); }
"#;

const JS: &str = r#"
const STORAGE_KEY = 'hrplatform_progress';
const esc = s => String(s).replace(/[&<>"']/g, c => ({ '&': '&amp;', '<': '&lt;', '>': '&gt;', '"': '&quot;', "'": '&#x27;' }[c]));
const readJson = id => { const el = document.getElementById(id); return el ? JSON.parse(el.textContent) : null; };
const SITE = readJson('site-data') || { search: [], questions: [] };

function showToast(message, duration = 3000) {
  const t = document.getElementById('toast');
  t.textContent = message; t.classList.add('show');
  setTimeout(() => t.classList.remove('show'), duration);
}

const Progress = {
  data: { quizHistory: [], viewedTreaties: [], viewedInstitutions: [], timeSpent: 0, lastVisit: null },
  load() {
    try {
      const saved = localStorage.getItem(STORAGE_KEY);
      if (saved) this.data = { ...this.data, ...JSON.parse(saved) };
    } catch (e) { console.warn('Could not load progress:', e); }
    this.data.lastVisit = new Date().toISOString();
    this.save();
  },
  save() {
    try { localStorage.setItem(STORAGE_KEY, JSON.stringify(this.data)); }
    catch (e) { console.warn('Could not save progress:', e); }
  },
  recordQuizAttempt(category, score, total) {
    this.data.quizHistory.push({ date: new Date().toISOString(), category, score, total, percentage: Math.round(score / total * 100) });
    if (this.data.quizHistory.length > 50) this.data.quizHistory = this.data.quizHistory.slice(-50);
    this.save();
  },
  recordView(kind, id) {
    const key = kind === 'treaty' ? 'viewedTreaties' : 'viewedInstitutions';
    if (!this.data[key].includes(id)) { this.data[key].push(id); this.save(); }
  },
  stats() {
    const s = this.data.quizHistory.map(h => h.percentage);
    if (!s.length) return { attempts: 0, avg: 0, best: 0 };
    return { attempts: s.length, avg: Math.round(s.reduce((a, b) => a + b, 0) / s.length), best: Math.max(...s) };
  }
};

function updateStats() {
  const s = Progress.stats();
  document.querySelectorAll('[data-stat]').forEach(el => {
    const k = el.dataset.stat;
    el.textContent = k === 'attempts' ? s.attempts : k === 'treaties' ? Progress.data.viewedTreaties.length : s[k] + '%';
  });
}

function openModal(html) {
  document.getElementById('modalBody').innerHTML = html;
  document.getElementById('detailModal').classList.add('open');
}
function closeModal() { document.getElementById('detailModal').classList.remove('open'); }

function navigate(id, filter) {
  if (!document.getElementById(id)) id = 'home';
  history.replaceState(null, '', '#' + id);
  document.querySelectorAll('.section').forEach(s => s.classList.toggle('active', s.id === id));
  document.querySelectorAll('.nav-link').forEach(l => l.classList.toggle('active', l.dataset.section === id));
  if (filter && id === 'spider-web') filterWeb(filter);
  window.scrollTo({ top: 0 });
}

// Timeline
function timelineRoot() { return document.getElementById('timeline'); }
function setTimelineView(view) {
  const root = timelineRoot(); if (!root) return;
  root.querySelectorAll('.view-btn').forEach(b => b.classList.toggle('active', b.dataset.view === view));
  root.querySelectorAll('.timeline-view').forEach(v => { v.hidden = v.dataset.view !== view; });
  if (view === 'zoom') scrollZoomInitial();
}
function setTimelineFilter(f) {
  const root = timelineRoot(); if (!root) return;
  root.querySelectorAll('.timeline-filters .filter-btn').forEach(b => b.classList.toggle('active', b.dataset.filter === f));
  const hit = el => f === 'all' || el.dataset.type === f;
  root.querySelectorAll('.era-blocks').forEach(el => { el.hidden = el.dataset.typeFilter !== f; });
  root.querySelectorAll('.zoom-marker').forEach(el => { el.style.opacity = hit(el) ? 1 : 0.15; });
  root.querySelectorAll('.stacked-row').forEach(el => { el.style.opacity = hit(el) ? 1 : 0.3; });
}
let zoom = 1;
function applyZoom() {
  const svg = document.querySelector('#zoomCanvas'); if (!svg) return;
  svg.setAttribute('width', svg.dataset.width * zoom);
  svg.querySelectorAll('[data-x]').forEach(el => el.setAttribute('transform', `translate(${el.dataset.x * zoom},${el.dataset.y || 0})`));
  svg.querySelectorAll('[data-x1]').forEach(el => { el.setAttribute('x', el.dataset.x1 * zoom); el.setAttribute('width', (el.dataset.x2 - el.dataset.x1) * zoom); });
  const label = document.getElementById('zoomLevel'); if (label) label.textContent = Math.round(zoom * 100) + '%';
}
function setZoom(z) { zoom = Math.min(4, Math.max(0.5, z)); applyZoom(); }
function scrollZoomInitial() {
  const sc = document.getElementById('zoomScroller'); if (!sc || sc.dataset.done) return;
  sc.dataset.done = '1'; sc.scrollLeft = Math.max(0, sc.dataset.focusX * zoom - sc.clientWidth / 3);
}
function setupZoom() {
  const sc = document.getElementById('zoomScroller'); if (!sc) return;
  document.getElementById('zoomIn')?.addEventListener('click', () => setZoom(zoom * 1.15));
  document.getElementById('zoomOut')?.addEventListener('click', () => setZoom(zoom / 1.15));
  document.getElementById('zoomReset')?.addEventListener('click', () => setZoom(1));
  sc.addEventListener('wheel', e => {
    e.preventDefault();
    if (e.shiftKey) sc.scrollLeft += Math.sign(e.deltaY) * 100;
    else setZoom(e.deltaY < 0 ? zoom * 1.15 : zoom / 1.15);
  }, { passive: false });
  let drag = null;
  sc.addEventListener('pointerdown', e => { drag = { x: e.clientX, left: sc.scrollLeft }; sc.classList.add('dragging'); });
  sc.addEventListener('pointermove', e => { if (drag) sc.scrollLeft = drag.left - (e.clientX - drag.x); });
  ['pointerup', 'pointerleave'].forEach(t => sc.addEventListener(t, () => { drag = null; sc.classList.remove('dragging'); }));
  document.querySelectorAll('.era-nav-btn').forEach(b => b.addEventListener('click', () => { sc.scrollLeft = Math.max(0, b.dataset.x * zoom - 100); }));
}

// Relationship diagram
function filterWeb(f) {
  document.querySelectorAll('#spider-web .filter-btn').forEach(b => b.classList.toggle('active', b.dataset.filter === f));
  document.querySelectorAll('#spider-web .node').forEach(n => { n.style.opacity = f === 'all' || n.dataset.system === f ? 1 : 0.1; });
  document.querySelectorAll('#spider-web .link').forEach(l => {
    l.style.opacity = f === 'all' || l.dataset.systems.split(' ').includes(f) ? 0.6 : 0.05;
  });
}
function setupWeb() {
  const nodes = document.querySelectorAll('#spider-web .node');
  nodes.forEach(n => {
    n.addEventListener('mouseenter', () => {
      const keep = new Set([n.dataset.id, ...(n.dataset.neighbors || '').split(' ')]);
      nodes.forEach(o => o.classList.toggle('dimmed', !keep.has(o.dataset.id)));
      document.querySelectorAll('#spider-web .link').forEach(l => l.classList.toggle('highlighted', l.dataset.source === n.dataset.id || l.dataset.target === n.dataset.id));
    });
    n.addEventListener('mouseleave', () => {
      nodes.forEach(o => o.classList.remove('dimmed'));
      document.querySelectorAll('#spider-web .link').forEach(l => l.classList.remove('highlighted'));
    });
    n.addEventListener('click', () => {
      const d = document.querySelector(`.node-detail[data-id="${n.dataset.id}"]`);
      if (d) { openModal(d.innerHTML); if (n.dataset.kind !== 'treaty') Progress.recordView('institution', n.dataset.id); }
    });
  });
  document.getElementById('webSearch')?.addEventListener('input', e => {
    const q = e.target.value.toLowerCase();
    nodes.forEach(n => { n.style.opacity = !q || n.dataset.label.toLowerCase().includes(q) || n.dataset.name.toLowerCase().includes(q) ? 1 : 0.1; });
  });
}

// Global search
function performSearch(q) {
  return SITE.search.filter(r => r.haystack.includes(q)).slice(0, 10);
}
function setupSearch() {
  const input = document.getElementById('globalSearch'), box = document.getElementById('searchResults');
  let timer;
  input.addEventListener('input', e => {
    clearTimeout(timer);
    const q = e.target.value.toLowerCase().trim();
    if (q.length < 2) { box.innerHTML = ''; box.classList.remove('active'); return; }
    timer = setTimeout(() => {
      const results = performSearch(q);
      box.innerHTML = results.length ? results.map(r => `<div class="search-result-item" data-type="${r.type}" data-id="${r.id}" data-section="${r.section}"><div>${esc(r.title)}</div><div class="search-result-subtitle">${esc(r.subtitle)}</div><span class="search-result-type">${r.type}</span></div>`).join('') : '<div class="search-result-item">No results found</div>';
      box.classList.add('active');
      box.querySelectorAll('[data-id]').forEach(item => item.addEventListener('click', () => {
        box.classList.remove('active'); input.value = '';
        const sel = item.dataset.type === 'event' ? `.event-detail[data-id="${item.dataset.id}"]` : item.dataset.type === 'treaty' ? `.treaty-detail[data-id="${item.dataset.id}"]` : `.node-detail[data-id="${item.dataset.id}"]`;
        if (item.dataset.type !== 'treaty') navigate(item.dataset.section);
        const d = document.querySelector(sel); if (d) openModal(d.innerHTML);
        if (item.dataset.type !== 'event') Progress.recordView(item.dataset.type, item.dataset.id);
      }));
    }, 200);
  });
}

// Quiz
const Quiz = { questions: [], index: 0, score: 0, answers: [], category: 'all' };
const RESULT_MESSAGES = [[90, 'Excellent! You have a strong understanding of international human rights law!'], [70, 'Good job! You have a solid grasp of the material.'], [50, 'Not bad! Consider reviewing the areas where you struggled.'], [0, 'Keep studying! Review the course materials and try again.']];
const quizEl = id => document.getElementById(id);
function correctIndex(q) { return q.correct; }
function optionsOf(q) { return q.options; }
function startQuiz() {
  const cat = quizEl('quizCategory').value, diff = quizEl('quizDifficulty').value, count = quizEl('quizCount').value;
  let qs = SITE.questions.filter(q => (cat === 'all' || q.category === cat) && (diff === 'all' || q.difficulty === diff));
  for (let i = qs.length - 1; i > 0; i--) { const j = Math.floor(Math.random() * (i + 1)); [qs[i], qs[j]] = [qs[j], qs[i]]; }
  if (count !== 'all') qs = qs.slice(0, parseInt(count));
  if (!qs.length) { showToast('No questions match your criteria. Try different filters.'); return; }
  Object.assign(Quiz, { questions: qs, index: 0, score: 0, answers: [], category: cat });
  quizEl('quizSetup').hidden = true; quizEl('quizContainer').hidden = false; quizEl('quizResults').hidden = true;
  showQuestion();
}
function showQuestion() {
  const q = Quiz.questions[Quiz.index];
  quizEl('quizProgressBar').style.width = (Quiz.index / Quiz.questions.length * 100) + '%';
  quizEl('quizProgressText').textContent = `Question ${Quiz.index + 1} of ${Quiz.questions.length}`;
  quizEl('quizMeta').textContent = q.category.replace('-', ' ') + ' \u2022 ' + q.difficulty;
  quizEl('quizQuestion').textContent = q.question;
  quizEl('quizOptions').innerHTML = optionsOf(q).map((o, i) => `<button class="quiz-option" data-answer="${i}"></button>`).join('');
  quizEl('quizOptions').querySelectorAll('.quiz-option').forEach((b, i) => { b.textContent = optionsOf(q)[i]; b.addEventListener('click', () => selectAnswer(i)); });
  quizEl('quizFeedback').hidden = true; quizEl('nextQuestion').disabled = true; quizEl('skipQuestion').disabled = false;
}
function selectAnswer(choice) {
  const q = Quiz.questions[Quiz.index], right = correctIndex(q), ok = choice === right;
  const buttons = quizEl('quizOptions').querySelectorAll('.quiz-option');
  buttons.forEach(b => { b.disabled = true; });
  buttons[choice].classList.add(ok ? 'correct' : 'incorrect');
  if (!ok && buttons[right]) buttons[right].classList.add('correct');
  if (ok) Quiz.score++;
  Quiz.answers.push({ q, choice, ok });
  const feedback = quizEl('quizFeedback');
  feedback.hidden = false;
  feedback.textContent = (ok ? 'Correct! ' : 'Incorrect. ') + q.explanation;
  if (q.examTip) {
    const tip = document.createElement('div');
    tip.className = 'exam-tip';
    tip.textContent = 'Exam tip: ' + q.examTip;
    feedback.appendChild(tip);
  }
  quizEl('nextQuestion').disabled = false; quizEl('skipQuestion').disabled = true;
}
function advanceQuiz() { Quiz.index++; if (Quiz.index >= Quiz.questions.length) showResults(); else showQuestion(); }
function skipQuestion() { Quiz.answers.push({ q: Quiz.questions[Quiz.index], choice: null, ok: false, skipped: true }); advanceQuiz(); }
function showResults() {
  quizEl('quizContainer').hidden = true; quizEl('quizResults').hidden = false;
  quizEl('finalScore').textContent = Quiz.score; quizEl('totalQuestions').textContent = Quiz.questions.length;
  Progress.recordQuizAttempt(Quiz.category, Quiz.score, Quiz.questions.length);
  const pct = Quiz.score / Quiz.questions.length * 100;
  quizEl('resultsMessage').textContent = RESULT_MESSAGES.find(([min]) => pct >= min)[1];
  updateStats();
}
function reviewAnswers() {
  openModal(Quiz.answers.map((a, i) => `<div class="review-item ${a.ok ? 'correct' : 'incorrect'}"><strong>${i + 1}. ${esc(a.q.question)}</strong><p>${a.skipped ? '<em>Skipped</em>' : 'Your answer: ' + esc(optionsOf(a.q)[a.choice] ?? 'N/A')}</p>${a.ok ? '' : `<p>Correct: ${esc(optionsOf(a.q)[correctIndex(a.q)] ?? 'N/A')}</p>`}<p>${esc(a.q.explanation)}</p></div>`).join(''));
}
function resetQuiz() { quizEl('quizSetup').hidden = false; quizEl('quizContainer').hidden = true; quizEl('quizResults').hidden = true; }

document.addEventListener('DOMContentLoaded', () => {
  Progress.load();
  const savedTheme = localStorage.getItem('theme');
  if (savedTheme) document.documentElement.dataset.theme = savedTheme;
  document.getElementById('themeToggle').addEventListener('click', () => {
    const next = document.documentElement.dataset.theme === 'dark' ? 'light' : 'dark';
    document.documentElement.dataset.theme = next;
    try { localStorage.setItem('theme', next); } catch (e) { console.warn('Could not save theme:', e); }
  });
  document.querySelectorAll('[data-section]').forEach(el => {
    if (el.closest('#searchResults')) return;
    el.addEventListener('click', e => { e.preventDefault(); navigate(el.dataset.section, el.dataset.filter); });
  });
  document.querySelectorAll('.view-btn').forEach(b => b.addEventListener('click', () => setTimelineView(b.dataset.view)));
  document.querySelectorAll('.timeline-filters .filter-btn').forEach(b => b.addEventListener('click', () => setTimelineFilter(b.dataset.filter)));
  document.querySelectorAll('.era-block').forEach(b => b.addEventListener('click', () => {
    const open = !b.classList.contains('expanded');
    document.querySelectorAll('.era-block').forEach(o => o.classList.toggle('expanded', open && o.dataset.era === b.dataset.era));
  }));
  document.querySelectorAll('[data-event]').forEach(el => el.addEventListener('click', e => {
    e.stopPropagation();
    const d = document.querySelector(`.event-detail[data-id="${el.dataset.event}"]`); if (d) openModal(d.innerHTML);
  }));
  document.querySelectorAll('#spider-web .filter-btn').forEach(b => b.addEventListener('click', () => filterWeb(b.dataset.filter)));
  document.querySelectorAll('#treaties .filter-btn').forEach(b => b.addEventListener('click', () => {
    document.querySelectorAll('#treaties .filter-btn').forEach(o => o.classList.toggle('active', o === b));
    document.querySelectorAll('.treaty-card').forEach(c => { c.hidden = b.dataset.filter !== 'all' && c.dataset.system !== b.dataset.filter; });
  }));
  document.querySelectorAll('.treaty-card').forEach(c => c.addEventListener('click', () => {
    const d = document.querySelector(`.treaty-detail[data-id="${c.dataset.id}"]`);
    if (d) { openModal(d.innerHTML); Progress.recordView('treaty', c.dataset.id); }
  }));
  const filterCases = () => {
    const court = document.getElementById('caseCourtFilter')?.value || 'all', cat = document.getElementById('caseCategoryFilter')?.value || 'all';
    const q = (document.getElementById('caseSearch')?.value || '').toLowerCase().trim();
    document.querySelectorAll('.case-card').forEach(c => { c.hidden = (court !== 'all' && c.dataset.court !== court) || (cat !== 'all' && c.dataset.category !== cat) || (q && !c.dataset.search.includes(q)); });
  };
  ['caseCourtFilter', 'caseCategoryFilter', 'caseSearch'].forEach(id => document.getElementById(id)?.addEventListener('input', filterCases));
  quizEl('startQuiz')?.addEventListener('click', startQuiz);
  quizEl('nextQuestion')?.addEventListener('click', advanceQuiz);
  quizEl('skipQuestion')?.addEventListener('click', skipQuestion);
  quizEl('retakeQuiz')?.addEventListener('click', resetQuiz);
  quizEl('reviewAnswers')?.addEventListener('click', reviewAnswers);
  document.getElementById('closeModal').addEventListener('click', closeModal);
  document.querySelector('.modal-backdrop').addEventListener('click', closeModal);
  document.addEventListener('keydown', e => {
    if (e.key === 'Escape') { closeModal(); return; }
    if (e.target.matches('input, select, textarea')) return;
    const sections = ['home', 'timeline', 'spider-web', 'treaties', 'quiz', 'about'];
    if (e.key >= '1' && e.key <= '6') navigate(sections[parseInt(e.key) - 1]);
    const sc = document.getElementById('zoomScroller');
    if (sc && timelineRoot()?.classList.contains('active')) {
      if (e.key === 'ArrowLeft') sc.scrollLeft -= 100;
      if (e.key === 'ArrowRight') sc.scrollLeft += 100;
    }
  });
  setupZoom(); setupWeb(); setupSearch(); updateStats();
  const hash = window.location.hash.slice(1);
  if (hash) navigate(hash);
  setInterval(() => { Progress.data.timeSpent += 1; if (Progress.data.timeSpent % 60 === 0) Progress.save(); }, 1000);
});
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escape_covers_markup() {
        assert_eq!(
            escape(r#"<a href="x">Tom & Jerry's</a>"#),
            "&lt;a href=&quot;x&quot;&gt;Tom &amp; Jerry&#x27;s&lt;/a&gt;"
        );
    }

    #[test]
    fn num_trims_whole_numbers() {
        assert_eq!(num(100.0), "100");
        assert_eq!(num(12.345), "12.3");
        assert_eq!(num(-0.04), "-0");
    }

    #[test]
    fn json_script_cannot_close_early() {
        let block = json_script("d", &vec!["</script><b>"]);
        assert!(!block[..block.len() - 10].contains("</script><b>"));
        assert!(block.contains("<\\/script>"));
    }

    #[test]
    fn empty_sections_are_omitted() {
        let shell = Shell {
            title: "Atlas & Co",
            theme: Theme::Dark,
            language: Language::Sl,
            active: Section::Home,
        };
        let html = document(
            &shell,
            &[
                (Section::Home, "<h1>Hi</h1>".into()),
                (Section::Timeline, String::new()),
            ],
            "",
        );
        assert!(html.contains("data-theme=\"dark\""));
        assert!(html.contains("lang=\"sl\""));
        assert!(html.contains("Atlas &amp; Co"));
        assert!(html.contains("id=\"home\""));
        assert!(!html.contains("id=\"timeline\""));
        assert!(!html.contains("href=\"#timeline\""));
    }
}
