use minijinja::{context, Environment};

use super::{NotifyError, StatusEmail};

// The ".html" name turns on minijinja's HTML auto-escaping for every value.
const TEMPLATE_NAME: &str = "status_update.html";

const STATUS_UPDATE_TEMPLATE: &str = r#"<html>
  <body style="font-family: Arial, sans-serif; line-height: 1.6; color: #333; max-width: 600px; margin: 0 auto; padding: 20px;">
    <div style="background-color: #2563eb; color: white; padding: 20px; border-radius: 8px 8px 0 0;">
      <h2 style="margin: 0;">Application Status Update</h2>
    </div>
    <div style="padding: 30px; background-color: #f9fafb; border: 1px solid #e5e7eb; border-top: none; border-radius: 0 0 8px 8px;">
      <p style="font-size: 16px;">Dear {{ candidate_name }},</p>
      <p style="font-size: 16px;">Your application for <strong>{{ job_title }}</strong> has been updated.</p>
      <div style="background-color: white; padding: 15px; border-left: 4px solid #2563eb; margin: 20px 0;">
        <p style="margin: 0; font-size: 16px;"><strong>New Status:</strong> {{ status }}</p>
      </div>
{%- if assignment_name and assignment_link %}
      <div style="background-color: #fef3c7; padding: 20px; border-radius: 8px; margin: 20px 0;">
        <h3 style="color: #92400e; margin-top: 0;">Assignment Details</h3>
        <p style="margin: 10px 0;"><strong>Assignment:</strong> {{ assignment_name }}</p>
        <p style="margin: 10px 0;">
          <a href="{{ assignment_link }}" style="color: #2563eb; text-decoration: none; font-weight: 500;">{{ assignment_link }}</a>
        </p>
        <p style="margin: 10px 0; color: #92400e;">Please complete the assignment and submit it through the provided link.</p>
      </div>
{%- endif %}
      <p style="margin-top: 30px; font-size: 16px;">Best regards,<br><strong>The Hiring Team</strong></p>
    </div>
  </body>
</html>
"#;

pub fn render_status_email(email: &StatusEmail) -> Result<String, NotifyError> {
    let mut env = Environment::new();
    env.add_template(TEMPLATE_NAME, STATUS_UPDATE_TEMPLATE)?;
    let template = env.get_template(TEMPLATE_NAME)?;

    let (assignment_name, assignment_link) = match email.assignment() {
        Some((name, link)) => (Some(name), Some(link)),
        None => (None, None),
    };

    let body = template.render(context! {
        candidate_name => email.candidate_name.as_str(),
        job_title => email.job_title.as_str(),
        status => email.status.as_str(),
        assignment_name => assignment_name,
        assignment_link => assignment_link,
    })?;
    Ok(body)
}
